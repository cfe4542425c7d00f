use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};

use crate::biometric::BiometricError;

/// Sleep for `duration` unless `cancel` becomes `true` first.
///
/// A cancellation that is already signalled wins even for a zero duration.
/// If every sender is dropped the delay simply runs to completion.
pub(super) async fn interruptible_delay(
    duration: Duration,
    cancel: &mut watch::Receiver<bool>,
) -> Result<(), BiometricError> {
    if *cancel.borrow() {
        return Err(BiometricError::Cancelled);
    }
    if duration.is_zero() {
        return Ok(());
    }

    let deadline = Instant::now() + duration;
    tokio::select! {
        _ = sleep_until(deadline) => Ok(()),
        changed = cancel.wait_for(|cancelled| *cancelled) => match changed {
            Ok(_) => {
                tracing::debug!("Simulated delay cancelled");
                Err(BiometricError::Cancelled)
            }
            Err(_) => {
                sleep_until(deadline).await;
                Ok(())
            }
        },
    }
}
