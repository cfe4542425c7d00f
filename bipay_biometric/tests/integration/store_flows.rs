use bipay_biometric::TemplateType;

use crate::common::{ALL_BACKENDS, open_backend, open_database};

#[tokio::test]
async fn test_enroll_and_authenticate_exact_template() {
    for kind in ALL_BACKENDS {
        // Given a store with one enrolled template
        let backend = open_backend(kind);
        let db = open_database(&backend).await;
        let template = "REAL_MINUTIAE_LOOP_0a1_0b2_0c3_dev_1_1700000000000";
        db.enroll("U1", template, TemplateType::Real).await;

        // When the exact same template is presented
        let matched = db.authenticate(template).await;

        // Then the owner should be returned
        assert_eq!(matched.as_deref(), Some("U1"), "backend {kind:?}");
    }
}

#[tokio::test]
async fn test_shared_pattern_identifies_first_enrolled_user() {
    for kind in ALL_BACKENDS {
        let backend = open_backend(kind);
        let db = open_database(&backend).await;
        db.enroll("U1", "WHORL_SPIRAL_aa_bb_1", TemplateType::Demo)
            .await;
        db.enroll("U2", "ARCH_LOOP_cc_dd_2", TemplateType::Demo).await;

        // Same pattern prefix, different minutiae
        let matched = db.authenticate("WHORL_SPIRAL_zz_yy_3").await;

        assert_eq!(matched.as_deref(), Some("U1"), "backend {kind:?}");
    }
}

#[tokio::test]
async fn test_empty_store_never_authenticates() {
    for kind in ALL_BACKENDS {
        let backend = open_backend(kind);
        let db = open_database(&backend).await;

        assert_eq!(db.authenticate("anything").await, None, "backend {kind:?}");
        assert_eq!(db.authenticate("").await, None, "backend {kind:?}");
    }
}

#[tokio::test]
async fn test_stats_count_distinct_users() {
    let backend = open_backend(crate::common::Backend::Memory);
    let db = open_database(&backend).await;

    // Given three users, one of them with two templates
    for (user, template_type) in [
        ("U1", TemplateType::Real),
        ("U1", TemplateType::Demo),
        ("U2", TemplateType::Demo),
        ("U3", TemplateType::Real),
    ] {
        let data = db.generate_template(template_type).await;
        db.enroll(user, &data, template_type).await;
    }

    // When reading stats
    let stats = db.get_stats().await;

    // Then templates and users should be counted separately
    assert_eq!(stats.total_templates, 4);
    assert_eq!(stats.real_templates, 2);
    assert_eq!(stats.demo_templates, 2);
    assert_eq!(stats.total_users, 3);
    assert!(stats.avg_quality >= 70.0 && stats.avg_quality < 100.0);

    assert_eq!(db.get_user_templates("U1").await.len(), 2);
    assert!(db.has_user_enrolled("U3").await);
    assert!(!db.has_user_enrolled("U4").await);
    assert!(db.get_user_templates("U4").await.is_empty());
}

#[tokio::test]
async fn test_generated_templates_have_expected_shape() {
    let backend = open_backend(crate::common::Backend::Memory);
    let db = open_database(&backend).await;

    let real = db.generate_template(TemplateType::Real).await;
    let demo = db.generate_template(TemplateType::Demo).await;

    assert!(real.starts_with("REAL_MINUTIAE_"));
    assert!(!demo.starts_with("REAL_"));
    // Generation alone enrolls nothing
    assert_eq!(db.get_stats().await.total_templates, 0);
}
