use serde::{Deserialize, Serialize};

use crate::biometric::TemplateType;

/// Capture method reported to callers.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum BiometricKind {
    #[serde(rename = "fingerprint")]
    Fingerprint,
    #[serde(rename = "faceId")]
    FaceId,
    #[serde(rename = "demo")]
    Demo,
}

impl BiometricKind {
    /// Template type recorded for enrollments made with this kind.
    pub fn template_type(&self) -> TemplateType {
        match self {
            BiometricKind::Demo => TemplateType::Demo,
            BiometricKind::Fingerprint | BiometricKind::FaceId => TemplateType::Real,
        }
    }
}

/// What the client told us about itself.
#[derive(Clone, Debug, Default)]
pub struct ClientEnvironment {
    pub user_agent: String,
    /// Whether a user-verifying platform authenticator was reported
    pub platform_authenticator_available: bool,
}

impl ClientEnvironment {
    pub fn new(user_agent: impl Into<String>, platform_authenticator_available: bool) -> Self {
        Self {
            user_agent: user_agent.into(),
            platform_authenticator_available,
        }
    }

    /// Platform authenticators and Apple/Android user agents count as
    /// fingerprint-capable; everything else falls back to demo mode.
    pub fn detect_kind(&self) -> BiometricKind {
        let ua = self.user_agent.as_str();
        if self.platform_authenticator_available
            || ua.contains("Mac")
            || ua.contains("iPhone")
            || ua.contains("Android")
        {
            BiometricKind::Fingerprint
        } else {
            BiometricKind::Demo
        }
    }
}

/// Envelope encoded by [`crate::BiometricProvider::generate_signature`].
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub(super) struct SignaturePayload {
    pub(super) data: String,
    pub(super) biometric: String,
    pub(super) timestamp: i64,
    #[serde(rename = "deviceId")]
    pub(super) device_id: String,
    #[serde(rename = "type")]
    pub(super) kind: BiometricKind,
}
