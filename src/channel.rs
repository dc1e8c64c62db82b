use crate::error::BotError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Kind of inbound channel, derived from the transport's channel id string.
///
/// SMS-like channels present numeric-shortcut menus and accept "1"/"2"
/// replies; everything else behaves like a standard chat channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Chat,
    Sms,
}

impl ChannelKind {
    /// Derive the channel kind from a transport channel id.
    ///
    /// Total: "sms" (any case) maps to `Sms`, everything else to `Chat`.
    pub fn from_channel_id(channel_id: &str) -> ChannelKind {
        if channel_id.eq_ignore_ascii_case("sms") {
            ChannelKind::Sms
        } else {
            ChannelKind::Chat
        }
    }

    pub fn is_sms(&self) -> bool {
        matches!(self, ChannelKind::Sms)
    }
}

// Transport wire types

/// An inbound activity from the transport layer.
#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    /// "message" drives a dialog turn; "conversation_started" triggers the
    /// one-time welcome card.
    #[serde(rename = "type")]
    pub kind: String,
    pub conversation_id: String,
    pub channel_id: String,
    #[serde(default)]
    pub text: Option<String>,
    /// Base URL the reply is POSTed back to.
    pub service_url: String,
}

impl Activity {
    pub fn is_message(&self) -> bool {
        self.kind == "message"
    }

    pub fn is_conversation_started(&self) -> bool {
        self.kind == "conversation_started"
    }

    pub fn channel_kind(&self) -> ChannelKind {
        ChannelKind::from_channel_id(&self.channel_id)
    }
}

/// A card with an image and a title, used for the one-time welcome card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroCard {
    pub title: String,
    pub subtitle: String,
    pub text: String,
    pub image_url: String,
}

/// An outbound payload: plain localized text, or the welcome card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Text { text: String },
    Card { card: HeroCard },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }
}

/// Wire shape of a reply delivery.
#[derive(Debug, Serialize)]
struct ReplyRequest<'a> {
    conversation_id: &'a str,
    #[serde(flatten)]
    payload: &'a OutboundMessage,
}

/// Client that delivers outbound messages back to the transport.
///
/// Replies are POSTed to `{service_url}/v3/conversations/{id}/activities`,
/// mirroring how the transport addressed us.
#[derive(Debug, Clone)]
pub struct ReplyClient {
    client: reqwest::Client,
}

impl ReplyClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Deliver one outbound message for a conversation.
    pub async fn send(
        &self,
        service_url: &str,
        conversation_id: &str,
        payload: &OutboundMessage,
    ) -> Result<(), BotError> {
        let url = format!(
            "{}/v3/conversations/{}/activities",
            service_url.trim_end_matches('/'),
            conversation_id
        );

        let request = ReplyRequest {
            conversation_id,
            payload,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Channel(format!("failed to reach {}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Channel(format!(
                "transport error ({}): {}",
                status, body
            )));
        }

        info!("delivered reply to conversation {}", conversation_id);
        Ok(())
    }
}

impl Default for ReplyClient {
    fn default() -> Self {
        Self::new()
    }
}
