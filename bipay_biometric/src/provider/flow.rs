use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::Rng;
use std::sync::Arc;
use tokio::sync::watch;

use crate::biometric::{BiometricDatabase, BiometricError, TemplateType, generate_legacy_demo_template};
use crate::config::{
    CREDENTIAL_KEY, CURRENT_TEMPLATE_ID_KEY, ENROLLED_FLAG_KEY, ENROLLED_TYPE_KEY,
    LEGACY_TEMPLATE_KEY,
};
use crate::storage::SharedKeyValueStore;
use crate::utils::now_millis;

use super::delay::interruptible_delay;
use super::types::{BiometricKind, ClientEnvironment, SignaturePayload};

const DEMO_SCAN_SUCCESS_RATE: f64 = 0.95;
const FALLBACK_DEVICE_ID: &str = "web_device";
const FALLBACK_CREDENTIAL_ID: &str = "real_biometric";

/// Entry point for UI flows: enrollment with simulated capture, scanning,
/// authentication and the signature envelope.
///
/// Every simulated delay takes a `watch::Receiver<bool>`; flipping it to `true`
/// aborts the operation with [`BiometricError::Cancelled`] before anything is
/// written.
pub struct BiometricProvider {
    db: Arc<BiometricDatabase>,
    backend: SharedKeyValueStore,
}

impl BiometricProvider {
    pub fn new(db: Arc<BiometricDatabase>) -> Self {
        let backend = db.backend();
        Self { db, backend }
    }

    pub fn database(&self) -> &Arc<BiometricDatabase> {
        &self.db
    }

    /// Decide which capture method to offer. Support is always reported;
    /// clients without a usable sensor get demo mode.
    pub fn detect_support(&self, env: &ClientEnvironment) -> BiometricKind {
        let kind = env.detect_kind();
        tracing::info!("Biometric support detected: {:?}", kind);
        kind
    }

    /// Whether an enrollment has been recorded in this session's storage.
    pub async fn is_enrolled(&self) -> Result<bool, BiometricError> {
        Ok(self.get_value(ENROLLED_FLAG_KEY).await?.as_deref() == Some("true"))
    }

    /// Capture (simulated) and enroll a template for `user_id`.
    ///
    /// Demo enrollment waits the configured capture delay first. No sensor is
    /// consulted for the other kinds; they enroll a generated `real` template.
    pub async fn enroll_user(
        &self,
        user_id: &str,
        kind: BiometricKind,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<String, BiometricError> {
        let template_type = kind.template_type();
        if template_type == TemplateType::Demo {
            interruptible_delay(self.db.config().enroll_delay, cancel).await?;
        }

        let template_data = self.db.generate_template(template_type).await;
        let template_id = self.db.enroll(user_id, &template_data, template_type).await;

        self.set_value(ENROLLED_FLAG_KEY, "true").await?;
        self.set_value(CURRENT_TEMPLATE_ID_KEY, &template_id).await?;
        self.set_value(ENROLLED_TYPE_KEY, template_type.as_str())
            .await?;

        Ok(template_id)
    }

    pub async fn authenticate_user(&self, biometric_data: &str) -> Option<String> {
        self.db.authenticate(biometric_data).await
    }

    /// Simulated scan: the stored base template (or a fresh one) tagged with
    /// `_SCAN_<millis>_<variance>`.
    pub async fn demo_fingerprint(
        &self,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<String, BiometricError> {
        interruptible_delay(self.db.config().scan_delay, cancel).await?;

        let stored = self.get_value(LEGACY_TEMPLATE_KEY).await?;
        let now = now_millis();
        let (base, variance) = self
            .db
            .with_rng(move |rng| {
                let base = stored.unwrap_or_else(|| generate_legacy_demo_template(now, rng));
                (base, rng.gen_range(0..1000u32))
            })
            .await;

        Ok(format!("{base}_SCAN_{now}_{variance}"))
    }

    /// Run a scan. Demo scans succeed 95% of the time; other kinds report
    /// success without consulting any hardware.
    pub async fn scan_fingerprint(
        &self,
        kind: BiometricKind,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<bool, BiometricError> {
        if kind != BiometricKind::Demo {
            return Ok(true);
        }

        let scan = self.demo_fingerprint(cancel).await?;
        tracing::debug!("Demo biometric scan: {}", scan);

        let success = self
            .db
            .with_rng(|rng| rng.gen_bool(DEMO_SCAN_SUCCESS_RATE))
            .await;
        interruptible_delay(self.db.config().scan_settle, cancel).await?;

        Ok(success)
    }

    /// Base64 of a JSON envelope binding `data` to a biometric sample.
    ///
    /// This is an encoding, not a signature: nothing is keyed or hashed.
    pub async fn generate_signature(
        &self,
        data: &serde_json::Value,
        kind: BiometricKind,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<String, BiometricError> {
        let device_id = self
            .get_value(&self.db.config().device_id_key)
            .await?
            .unwrap_or_else(|| FALLBACK_DEVICE_ID.to_string());
        let timestamp = now_millis();

        let biometric = match kind {
            BiometricKind::Demo => self.demo_fingerprint(cancel).await?,
            BiometricKind::Fingerprint | BiometricKind::FaceId => self.credential_id().await?,
        };

        let payload = SignaturePayload {
            data: serde_json::to_string(data)?,
            biometric,
            timestamp,
            device_id,
            kind,
        };

        Ok(STANDARD.encode(serde_json::to_vec(&payload)?))
    }

    async fn credential_id(&self) -> Result<String, BiometricError> {
        let Some(raw) = self.get_value(CREDENTIAL_KEY).await? else {
            return Ok(FALLBACK_CREDENTIAL_ID.to_string());
        };
        let credential: serde_json::Value = serde_json::from_str(&raw)?;
        Ok(credential
            .get("id")
            .and_then(|id| id.as_str())
            .unwrap_or(FALLBACK_CREDENTIAL_ID)
            .to_string())
    }

    async fn get_value(&self, key: &str) -> Result<Option<String>, BiometricError> {
        Ok(self.backend.lock().await.get(key).await?)
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<(), BiometricError> {
        Ok(self.backend.lock().await.set(key, value.to_string()).await?)
    }
}
