mod delay;
mod flow;
mod types;

pub use flow::BiometricProvider;
pub use types::{BiometricKind, ClientEnvironment};
