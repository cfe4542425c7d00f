use chrono::Utc;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Current time as milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub(crate) fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Identifier of the form `<prefix>_<millis>_<9 base36 chars>`.
pub(crate) fn gen_timestamped_id<R: Rng + ?Sized>(prefix: &str, now: i64, rng: &mut R) -> String {
    format!("{prefix}_{now}_{}", random_base36(rng, 9))
}
