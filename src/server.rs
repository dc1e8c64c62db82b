use crate::channel::{Activity, ReplyClient};
use crate::dialog::Dialog;
use crate::i18n::{DetectionMetrics, MetricsReport};
use crate::security::verify_webhook_secret;
use crate::session::SessionStore;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Header carrying the transport's webhook secret.
const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Shared state for the HTTP surface.
#[derive(Clone)]
pub struct AppState {
    pub dialog: Dialog,
    pub sessions: Arc<SessionStore>,
    pub replies: ReplyClient,
    pub webhook_secret: String,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics() -> Json<MetricsReport> {
    Json(DetectionMetrics::global().report())
}

/// One inbound transport activity.
///
/// A "conversation_started" activity triggers the one-time welcome card; a
/// "message" activity drives a dialog turn for its conversation. Anything
/// else is acknowledged and ignored.
async fn webhook(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(activity): Json<Activity>,
) -> StatusCode {
    let provided = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    if !verify_webhook_secret(&app.webhook_secret, provided) {
        warn!("webhook secret mismatch");
        return StatusCode::UNAUTHORIZED;
    }

    if activity.is_conversation_started() {
        let card = Dialog::welcome_card();
        return match app
            .replies
            .send(&activity.service_url, &activity.conversation_id, &card)
            .await
        {
            Ok(()) => StatusCode::OK,
            Err(e) => {
                warn!("welcome card delivery failed: {}", e);
                StatusCode::BAD_GATEWAY
            }
        };
    }

    if !activity.is_message() {
        info!("ignoring activity of type '{}'", activity.kind);
        return StatusCode::OK;
    }

    let Some(text) = activity.text.as_deref().filter(|t| !t.is_empty()) else {
        return StatusCode::OK;
    };

    // One entry per conversation; holding its lock for the turn keeps turns
    // strictly sequential within a conversation.
    let entry = app
        .sessions
        .entry(&activity.conversation_id, activity.channel_kind())
        .await;
    let mut state = entry.lock().await;

    let outbound = app.dialog.handle_turn(&mut state, text).await;

    for message in &outbound {
        if let Err(e) = app
            .replies
            .send(&activity.service_url, &activity.conversation_id, message)
            .await
        {
            warn!(
                "reply delivery failed for {}: {}",
                activity.conversation_id, e
            );
            return StatusCode::BAD_GATEWAY;
        }
    }

    StatusCode::OK
}
