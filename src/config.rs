use anyhow::{Context, Result};

/// Settings for the external language-detection capability.
#[derive(Debug, Clone)]
pub struct DetectionSettings {
    pub endpoint: String,
    pub api_key: String,
}

/// Settings for the external Q&A matching capability.
#[derive(Debug, Clone)]
pub struct QnaSettings {
    pub endpoint: String,
    pub api_key: String,
    pub knowledge_base_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub webhook_secret: String,

    // Capabilities. Absence is not a startup failure: the dialog reports a
    // setup-error message and refuses to proceed past initial receipt.
    pub detection: Option<DetectionSettings>,
    pub qna: Option<QnaSettings>,

    // Session lifecycle (transport-level, not part of the dialog core)
    pub session_idle_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let detection = match (
            std::env::var("DETECTION_ENDPOINT").ok(),
            std::env::var("DETECTION_API_KEY").ok(),
        ) {
            (Some(endpoint), Some(api_key)) => Some(DetectionSettings { endpoint, api_key }),
            _ => None,
        };

        let qna = match (
            std::env::var("QNA_ENDPOINT").ok(),
            std::env::var("QNA_API_KEY").ok(),
            std::env::var("QNA_KB_ID").ok(),
        ) {
            (Some(endpoint), Some(api_key), Some(knowledge_base_id)) => Some(QnaSettings {
                endpoint,
                api_key,
                knowledge_base_id,
            }),
            _ => None,
        };

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            webhook_secret: std::env::var("WEBHOOK_SECRET")
                .context("WEBHOOK_SECRET not set")?,

            detection,
            qna,

            session_idle_hours: std::env::var("SESSION_IDLE_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
        })
    }

    /// Whether every capability a dialog turn needs is configured.
    pub fn capabilities_configured(&self) -> bool {
        self.detection.is_some() && self.qna.is_some()
    }
}
