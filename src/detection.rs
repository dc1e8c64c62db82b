use crate::config::DetectionSettings;
use crate::error::BotError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Language-detection capability.
///
/// The dialog core calls this at most once per conversation; production
/// wiring points at the translator service's `/detect` route.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text`, returning an ISO 639-1 code.
    async fn detect(&self, text: &str) -> Result<String, BotError>;
}

/// Detection request item; the service takes a one-element batch.
#[derive(Debug, Serialize)]
struct DetectItem<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

/// One detection result; the service answers with a one-element batch.
#[derive(Debug, Deserialize)]
struct DetectResult {
    language: String,
}

/// HTTP-backed detector for the translator service.
pub struct HttpLanguageDetector {
    client: reqwest::Client,
    settings: DetectionSettings,
}

impl HttpLanguageDetector {
    pub fn new(settings: DetectionSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl LanguageDetector for HttpLanguageDetector {
    async fn detect(&self, text: &str) -> Result<String, BotError> {
        let body = [DetectItem { text }];

        let response = self
            .client
            .post(&self.settings.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BotError::Detection(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Detection(format!(
                "detection service error ({}): {}",
                status, body
            )));
        }

        let results: Vec<DetectResult> = response
            .json()
            .await
            .map_err(|e| BotError::Detection(format!("unparseable response: {}", e)))?;

        let code = results
            .into_iter()
            .next()
            .map(|r| r.language)
            .ok_or_else(|| BotError::Detection("empty detection response".to_string()))?;

        if code.trim().is_empty() {
            return Err(BotError::Detection(
                "detection response carried no language code".to_string(),
            ));
        }

        Ok(code)
    }
}
