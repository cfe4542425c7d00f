use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bipay_biometric::{
    BiometricConfig, BiometricDatabase, BiometricError, BiometricProvider, ClientEnvironment,
    open_backend_from_env,
};

fn init_tracing(app_name: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            format!("bipay_biometric=debug,{}=debug,info", app_name).into()
        }

        #[cfg(not(debug_assertions))]
        {
            "info".into()
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("You can increase verbosity by setting the RUST_LOG environment variable.");
}

fn client_environment() -> ClientEnvironment {
    let user_agent = std::env::var("DEMO_USER_AGENT").unwrap_or_default();
    let authenticator = std::env::var("DEMO_PLATFORM_AUTHENTICATOR")
        .map(|v| v == "true")
        .unwrap_or(false);
    ClientEnvironment::new(user_agent, authenticator)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing("demo_biometric");

    let backend = match open_backend_from_env().await.map_err(BiometricError::from) {
        Ok(backend) => backend,
        Err(BiometricError::Config(msg)) => {
            tracing::error!("Invalid key-value store configuration: {}", msg);
            return Err(msg.into());
        }
        Err(e) => return Err(e.into()),
    };
    let db = Arc::new(BiometricDatabase::open(backend, BiometricConfig::from_env()).await);
    let provider = BiometricProvider::new(db.clone());

    // Ctrl-C aborts whichever simulated capture is in progress
    let (cancel_tx, mut cancel) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling");
            cancel_tx.send(true).ok();
        }
    });

    let user_id = std::env::var("DEMO_USER_ID").unwrap_or_else(|_| "demo_user".to_string());
    let kind = provider.detect_support(&client_environment());

    let template_id = match provider.enroll_user(&user_id, kind, &mut cancel).await {
        Ok(id) => id,
        Err(BiometricError::Cancelled) => {
            tracing::warn!("Enrollment cancelled");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!("Enrolled {} with template {}", user_id, template_id);

    let scanned = provider.scan_fingerprint(kind, &mut cancel).await?;
    tracing::info!("Scan accepted: {}", scanned);

    let templates = db.get_user_templates(&user_id).await;
    if let Some(latest) = templates.last() {
        match provider.authenticate_user(&latest.template_data).await {
            Some(matched) => tracing::info!("Authenticated as {}", matched),
            None => tracing::warn!("Authentication failed"),
        }
    }

    let payment = serde_json::json!({"amount": "10.00", "currency": "USD", "to": "bipay_merchant"});
    let signature = provider
        .generate_signature(&payment, kind, &mut cancel)
        .await?;
    tracing::info!("Payment signature: {}", signature);

    let stats = db.get_stats().await;
    tracing::info!("Store stats: {}", serde_json::to_string(&stats)?);

    Ok(())
}
