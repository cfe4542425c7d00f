use base64::{Engine as _, engine::general_purpose::STANDARD};
use bipay_biometric::{
    BiometricError, BiometricKind, ClientEnvironment, ENROLLED_FLAG_KEY, TemplateType,
};
use tokio::sync::watch;

use crate::common::{ALL_BACKENDS, Backend, open_provider};

#[tokio::test]
async fn test_demo_enroll_then_authenticate() {
    for kind in ALL_BACKENDS {
        // Given a desktop client without a platform authenticator
        let (provider, _) = open_provider(kind).await;
        let (_tx, mut cancel) = watch::channel(false);
        let biometric = provider.detect_support(&ClientEnvironment::new(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
            false,
        ));
        assert_eq!(biometric, BiometricKind::Demo);

        // When the user enrolls
        let template_id = provider
            .enroll_user("alice", biometric, &mut cancel)
            .await
            .unwrap();

        // Then the session should be marked enrolled and the template should match
        assert!(provider.is_enrolled().await.unwrap(), "backend {kind:?}");
        let templates = provider.database().get_user_templates("alice").await;
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, template_id);
        assert_eq!(templates[0].template_type, TemplateType::Demo);
        assert_eq!(
            provider
                .authenticate_user(&templates[0].template_data)
                .await
                .as_deref(),
            Some("alice")
        );
    }
}

#[tokio::test]
async fn test_cancelled_enrollment_leaves_no_trace() {
    let (provider, backend) = open_provider(Backend::Sqlite).await;
    let (tx, mut cancel) = watch::channel(false);
    tx.send(true).unwrap();

    let result = provider
        .enroll_user("bob", BiometricKind::Demo, &mut cancel)
        .await;

    assert!(matches!(result, Err(BiometricError::Cancelled)));
    assert!(!provider.database().has_user_enrolled("bob").await);
    assert_eq!(backend.lock().await.get(ENROLLED_FLAG_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_signature_envelope_decodes() {
    let (provider, _) = open_provider(Backend::Memory).await;
    let (_tx, mut cancel) = watch::channel(false);
    provider
        .enroll_user("carol", BiometricKind::Fingerprint, &mut cancel)
        .await
        .unwrap();

    let data = serde_json::json!({"amount": "12.50", "recipient": "dave"});
    let signature = provider
        .generate_signature(&data, BiometricKind::Fingerprint, &mut cancel)
        .await
        .unwrap();

    let envelope: serde_json::Value =
        serde_json::from_slice(&STANDARD.decode(signature).unwrap()).unwrap();
    assert_eq!(envelope["data"], serde_json::to_string(&data).unwrap());
    assert_eq!(envelope["biometric"], "real_biometric");
    assert_eq!(envelope["type"], "fingerprint");
    assert!(envelope["deviceId"].as_str().unwrap().starts_with("dev_"));
    assert!(envelope["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_fingerprint_scan_always_succeeds() {
    let (provider, _) = open_provider(Backend::Memory).await;
    let (_tx, mut cancel) = watch::channel(false);

    for _ in 0..10 {
        assert!(
            provider
                .scan_fingerprint(BiometricKind::FaceId, &mut cancel)
                .await
                .unwrap()
        );
    }
}
