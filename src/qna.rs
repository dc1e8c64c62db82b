use crate::config::QnaSettings;
use crate::error::BotError;
use crate::i18n::Locale;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Minimum score a knowledge-base match must reach to count as an answer.
const SCORE_THRESHOLD: f64 = 0.5;

/// Sentinel answer some knowledge-base deployments return instead of an
/// empty match list.
const NO_MATCH_SENTINEL: &str = "No good match found in KB.";

/// Q&A matching capability, consumed by the Get-Answers sub-flow.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Find the best answer for a question, or `None` when the knowledge
    /// base has nothing above the match threshold.
    async fn best_answer(&self, question: &str, locale: Locale)
        -> Result<Option<String>, BotError>;
}

#[derive(Debug, Serialize)]
struct QnaRequest<'a> {
    question: &'a str,
    language: &'a str,
}

#[derive(Debug, Deserialize)]
struct QnaResponse {
    answers: Vec<QnaAnswer>,
}

#[derive(Debug, Deserialize)]
struct QnaAnswer {
    answer: String,
    score: f64,
}

/// HTTP-backed client for the knowledge-base service.
pub struct QnaClient {
    client: reqwest::Client,
    settings: QnaSettings,
}

impl QnaClient {
    pub fn new(settings: QnaSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn query_url(&self) -> String {
        format!(
            "{}/knowledgebases/{}/generateAnswer",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.knowledge_base_id
        )
    }
}

#[async_trait]
impl AnswerSource for QnaClient {
    async fn best_answer(
        &self,
        question: &str,
        locale: Locale,
    ) -> Result<Option<String>, BotError> {
        let request = QnaRequest {
            question,
            language: locale.code(),
        };

        let response = self
            .client
            .post(self.query_url())
            .header("Ocp-Apim-Subscription-Key", &self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Qna(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Qna(format!(
                "knowledge-base error ({}): {}",
                status, body
            )));
        }

        let parsed: QnaResponse = response
            .json()
            .await
            .map_err(|e| BotError::Qna(format!("unparseable response: {}", e)))?;

        let best = parsed
            .answers
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score));

        let answer = match best {
            Some(a) if a.score >= SCORE_THRESHOLD && a.answer != NO_MATCH_SENTINEL => {
                info!("knowledge base answered with score {:.2}", a.score);
                Some(a.answer)
            }
            _ => None,
        };

        Ok(answer)
    }
}
