use anyhow::Result;
use helpline_bot::channel::ReplyClient;
use helpline_bot::config::Config;
use helpline_bot::detection::HttpLanguageDetector;
use helpline_bot::dialog::{Capabilities, Dialog};
use helpline_bot::qna::QnaClient;
use helpline_bot::scheduler;
use helpline_bot::server::{router, AppState};
use helpline_bot::session::SessionStore;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("helpline_bot=info".parse()?),
        )
        .init();

    info!("Starting helpline bot");

    // Load configuration from environment
    let config = Arc::new(Config::from_env()?);

    // Wire the capability clients. Missing settings are not fatal here: the
    // dialog reports a setup-error message until they are provided.
    if !config.capabilities_configured() {
        warn!("capability settings incomplete; dialog will report a setup error");
    }
    let capabilities = config
        .detection
        .clone()
        .zip(config.qna.clone())
        .map(|(detection, qna)| Capabilities {
            detector: Arc::new(HttpLanguageDetector::new(detection)),
            answers: Arc::new(QnaClient::new(qna)),
        });

    let sessions = Arc::new(SessionStore::new());

    // Idle-session sweep
    let _scheduler = scheduler::start_scheduler(Arc::clone(&config), Arc::clone(&sessions)).await?;

    let app = router(AppState {
        dialog: Dialog::new(capabilities),
        sessions,
        replies: ReplyClient::new(),
        webhook_secret: config.webhook_secret.clone(),
    });

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
