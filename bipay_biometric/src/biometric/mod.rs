mod errors;
mod main;
mod types;

pub use errors::BiometricError;
pub use main::{BiometricDatabase, extract_pattern, longest_common_prefix_len, raw_similarity};
pub use types::{BiometricStats, BiometricTemplate, DeviceInfo, TemplateType};

pub(crate) use main::generator::generate_legacy_demo_template;
