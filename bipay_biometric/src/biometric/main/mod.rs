mod database;
pub(crate) mod generator;
pub(crate) mod matcher;

pub use database::BiometricDatabase;
pub use matcher::{extract_pattern, longest_common_prefix_len, raw_similarity};
