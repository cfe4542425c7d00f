use bipay_biometric::TemplateType;

use crate::common::{ALL_BACKENDS, open_backend, open_database, test_config};

#[tokio::test]
async fn test_state_survives_reopen() {
    for kind in ALL_BACKENDS {
        // Given a store with enrollments and one successful authentication
        let backend = open_backend(kind);
        let db = open_database(&backend).await;
        let first = db.generate_template(TemplateType::Real).await;
        let first_id = db.enroll("U1", &first, TemplateType::Real).await;
        let second = db.generate_template(TemplateType::Demo).await;
        db.enroll("U2", &second, TemplateType::Demo).await;
        assert_eq!(db.authenticate(&first).await.as_deref(), Some("U1"));
        drop(db);

        // When a new store is opened over the same backend
        let reopened = open_database(&backend).await;

        // Then templates, users and usage should be restored
        let stats = reopened.get_stats().await;
        assert_eq!(stats.total_templates, 2, "backend {kind:?}");
        assert_eq!(stats.total_users, 2, "backend {kind:?}");
        let templates = reopened.get_user_templates("U1").await;
        assert_eq!(templates[0].id, first_id);
        assert_eq!(templates[0].usage_count, 1);
        assert!(templates[0].last_used >= templates[0].enrollment_timestamp);
        assert_eq!(reopened.authenticate(&second).await.as_deref(), Some("U2"));
    }
}

#[tokio::test]
async fn test_snapshot_is_stored_under_database_key() {
    for kind in ALL_BACKENDS {
        let backend = open_backend(kind);
        let db = open_database(&backend).await;
        db.enroll("U1", "ARCH_LOOP_01_02_3", TemplateType::Demo)
            .await;

        let raw = backend
            .lock()
            .await
            .get(&test_config().db_key)
            .await
            .unwrap()
            .expect("snapshot written");
        let snapshot: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(snapshot["templates"].as_array().unwrap().len(), 1);
        assert_eq!(snapshot["userTemplates"][0][0], "U1");
        assert_eq!(snapshot["templates"][0][1]["type"], "demo");
        assert_eq!(snapshot["templates"][0][1]["user_id"], "U1");
    }
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty() {
    for kind in ALL_BACKENDS {
        let backend = open_backend(kind);
        backend.lock().await.init().await.unwrap();
        backend
            .lock()
            .await
            .set(&test_config().db_key, "{broken".to_string())
            .await
            .unwrap();

        let db = open_database(&backend).await;

        assert_eq!(db.get_stats().await.total_templates, 0, "backend {kind:?}");
        // The store is still usable and overwrites the corrupt value
        db.enroll("U1", "ARCH_LOOP_01_02_3", TemplateType::Demo)
            .await;
        assert_eq!(open_database(&backend).await.get_stats().await.total_users, 1);
    }
}
