use thiserror::Error;

/// Error taxonomy for the dialog core.
///
/// The core never retries on its own: a failed turn leaves the conversation
/// in a state where the user's next message naturally retries the operation.
#[derive(Debug, Error)]
pub enum BotError {
    /// Required capability settings (detection / Q&A endpoints and keys)
    /// are absent. Surfaced as an instructional message; the conversation
    /// stays at its initial phase.
    #[error("capability configuration missing")]
    ConfigurationMissing,

    /// The language-detection capability failed or returned unparseable
    /// output. Fatal for the turn; the language code stays unset so the
    /// next turn retries detection.
    #[error("language detection failed: {0}")]
    Detection(String),

    /// The Q&A capability failed. Handled inside the Get-Answers sub-flow.
    #[error("q&a lookup failed: {0}")]
    Qna(String),

    /// Outbound delivery through the transport channel failed.
    #[error("channel delivery failed: {0}")]
    Channel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BotError::Detection("timeout".to_string());
        assert_eq!(err.to_string(), "language detection failed: timeout");

        let err = BotError::ConfigurationMissing;
        assert_eq!(err.to_string(), "capability configuration missing");
    }
}
