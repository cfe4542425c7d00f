//! Central configuration for the bipay_biometric crate

use std::{env, str::FromStr, sync::LazyLock, time::Duration};

/// Storage key holding the serialized template database
///
/// Default: "bipay_biometric_database"
pub static BIOMETRIC_DB_KEY: LazyLock<String> = LazyLock::new(|| {
    env::var("BIOMETRIC_DB_KEY").unwrap_or_else(|_| "bipay_biometric_database".to_string())
});

/// Storage key holding the per-installation device identifier
///
/// Default: "bipay_device_id"
pub static BIOMETRIC_DEVICE_ID_KEY: LazyLock<String> = LazyLock::new(|| {
    env::var("BIOMETRIC_DEVICE_ID_KEY").unwrap_or_else(|_| "bipay_device_id".to_string())
});

// Session flags written by the provider after a successful enrollment
pub const ENROLLED_FLAG_KEY: &str = "bipay_biometric_enrolled";
pub const CURRENT_TEMPLATE_ID_KEY: &str = "bipay_current_template_id";
pub const ENROLLED_TYPE_KEY: &str = "bipay_biometric_type";
/// Base template reused by the demo scanner when present
pub const LEGACY_TEMPLATE_KEY: &str = "bipay_biometric_template";
/// JSON credential (with an `id` field) used for non-demo signatures
pub const CREDENTIAL_KEY: &str = "bipay_biometric_credential";

const DEFAULT_REAL_THRESHOLD: f64 = 0.85;
const DEFAULT_DEMO_THRESHOLD: f64 = 0.75;
const DEFAULT_ENROLL_DELAY_MS: u64 = 3000;
const DEFAULT_SCAN_DELAY_MS: u64 = 1500;
const DEFAULT_SCAN_SETTLE_MS: u64 = 1000;

/// Runtime settings for the template store and the provider.
///
/// `Default` gives the stock values; [`BiometricConfig::from_env`] lets each one
/// be overridden through the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct BiometricConfig {
    /// Key under which the whole database snapshot is stored
    pub db_key: String,
    /// Key under which the device id is stored
    pub device_id_key: String,
    /// Minimum similarity for templates of type `real`
    pub real_threshold: f64,
    /// Minimum similarity for templates of type `demo`
    pub demo_threshold: f64,
    /// Simulated capture time for demo enrollment
    pub enroll_delay: Duration,
    /// Simulated fingerprint scan time
    pub scan_delay: Duration,
    /// Pause after a demo scan before the result is reported
    pub scan_settle: Duration,
    /// Platform string recorded in device info
    pub platform: String,
    /// User agent string recorded in device info
    pub user_agent: String,
}

impl Default for BiometricConfig {
    fn default() -> Self {
        Self {
            db_key: "bipay_biometric_database".to_string(),
            device_id_key: "bipay_device_id".to_string(),
            real_threshold: DEFAULT_REAL_THRESHOLD,
            demo_threshold: DEFAULT_DEMO_THRESHOLD,
            enroll_delay: Duration::from_millis(DEFAULT_ENROLL_DELAY_MS),
            scan_delay: Duration::from_millis(DEFAULT_SCAN_DELAY_MS),
            scan_settle: Duration::from_millis(DEFAULT_SCAN_SETTLE_MS),
            platform: env::consts::OS.to_string(),
            user_agent: concat!("bipay-biometric/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl BiometricConfig {
    /// Build the configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_key: BIOMETRIC_DB_KEY.clone(),
            device_id_key: BIOMETRIC_DEVICE_ID_KEY.clone(),
            real_threshold: env_or("BIOMETRIC_REAL_THRESHOLD", DEFAULT_REAL_THRESHOLD),
            demo_threshold: env_or("BIOMETRIC_DEMO_THRESHOLD", DEFAULT_DEMO_THRESHOLD),
            enroll_delay: Duration::from_millis(env_or(
                "BIOMETRIC_ENROLL_DELAY_MS",
                DEFAULT_ENROLL_DELAY_MS,
            )),
            scan_delay: Duration::from_millis(env_or(
                "BIOMETRIC_SCAN_DELAY_MS",
                DEFAULT_SCAN_DELAY_MS,
            )),
            scan_settle: Duration::from_millis(env_or(
                "BIOMETRIC_SCAN_SETTLE_MS",
                DEFAULT_SCAN_SETTLE_MS,
            )),
            platform: env::var("BIOMETRIC_PLATFORM").unwrap_or(defaults.platform),
            user_agent: env::var("BIOMETRIC_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }

    /// Same as `Default` but with every artificial delay set to zero.
    pub fn without_delays() -> Self {
        Self {
            enroll_delay: Duration::ZERO,
            scan_delay: Duration::ZERO,
            scan_settle: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn env_or<T: FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparsable value for {}: {:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}
