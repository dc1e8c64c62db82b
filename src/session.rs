use crate::channel::ChannelKind;
use crate::dialog::ConversationState;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// In-memory store of live conversation sessions.
///
/// Each conversation owns one entry; a turn holds the entry's lock for its
/// full duration, which makes turns strictly sequential per conversation
/// while distinct conversations proceed in parallel. Entries are created on
/// first inbound message and removed by the idle sweep.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<Mutex<ConversationState>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the session entry for a conversation, creating it on first use.
    pub async fn entry(
        &self,
        conversation_id: &str,
        channel: ChannelKind,
    ) -> Arc<Mutex<ConversationState>> {
        let mut sessions = self.sessions.lock().await;
        Arc::clone(
            sessions
                .entry(conversation_id.to_string())
                .or_insert_with(|| {
                    info!("new conversation session: {}", conversation_id);
                    Arc::new(Mutex::new(ConversationState::new(channel)))
                }),
        )
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Drop sessions idle for longer than `max_idle`.
    ///
    /// Entries whose lock is held are mid-turn and therefore not idle.
    /// Returns the number of sessions removed.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| match entry.try_lock() {
            Ok(state) => state.last_activity > cutoff,
            Err(_) => true,
        });
        let removed = before - sessions.len();
        if removed > 0 {
            info!("swept {} idle session(s)", removed);
        }
        removed
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
