//! The per-conversation dialog state machine.
//!
//! One inbound message drives exactly one turn. The machine resolves the
//! conversation's locale (calling the detection capability at most once per
//! conversation), renders localized prompts, classifies replies against the
//! localized menu, and steps sub-flows to completion before returning to the
//! menu. State lives in an explicit [`ConversationState`] value owned by the
//! conversation's session entry and passed through every transition.

use crate::channel::{ChannelKind, HeroCard, OutboundMessage};
use crate::detection::LanguageDetector;
use crate::error::BotError;
use crate::i18n::{DetectionMetrics, Locale};
use crate::menu::{match_choice, render_menu};
use crate::qna::AnswerSource;
use crate::subflow::{self, SubflowKind, SubflowStep};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Where a conversation currently is.
///
/// `AwaitFirstMessage` is entered exactly once; after the first successful
/// turn the conversation loops between the menu and sub-flows until the
/// transport ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    AwaitFirstMessage,
    AwaitMenuChoice,
    InSubflow(SubflowKind),
}

/// Per-conversation record, owned by the conversation's session entry.
#[derive(Debug, Clone)]
pub struct ConversationState {
    /// Raw code from the detection capability. Set at most once; only the
    /// language-change sub-flow may overwrite it afterwards.
    pub detected_language_code: Option<String>,

    /// Working locale, recomputed each turn from the stored code.
    pub locale: Locale,

    /// Whether numeric-shortcut matching and SMS menu variants apply.
    pub channel: ChannelKind,

    pub phase: DialogPhase,

    /// Stamp of the most recent turn; read by the idle-session sweep.
    pub last_activity: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(channel: ChannelKind) -> Self {
        Self {
            detected_language_code: None,
            locale: Locale::default(),
            channel,
            phase: DialogPhase::AwaitFirstMessage,
            last_activity: Utc::now(),
        }
    }
}

/// What to do when a menu reply matches no known choice.
///
/// The default is to wait silently for another reply; re-prompting is
/// available as a policy switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnrecognizedReplyPolicy {
    #[default]
    Silent,
    Reprompt,
}

/// The external capabilities a dialog turn may need.
#[derive(Clone)]
pub struct Capabilities {
    pub detector: Arc<dyn LanguageDetector>,
    pub answers: Arc<dyn AnswerSource>,
}

/// The dialog engine: stateless itself, it advances a
/// [`ConversationState`] one inbound message at a time.
#[derive(Clone)]
pub struct Dialog {
    /// `None` when the capability settings are absent; every turn then
    /// reports the setup-error message and refuses to leave the initial
    /// phase.
    capabilities: Option<Capabilities>,
    policy: UnrecognizedReplyPolicy,
}

impl Dialog {
    pub fn new(capabilities: Option<Capabilities>) -> Self {
        Self {
            capabilities,
            policy: UnrecognizedReplyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnrecognizedReplyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Process one inbound message for a conversation.
    ///
    /// Each transition contributes exactly one outbound message; a turn that
    /// both finishes a sub-flow and re-enters the menu therefore yields two
    /// (the sub-flow's final output, then the ask-again prompt). An
    /// unrecognized menu reply under the `Silent` policy yields none.
    pub async fn handle_turn(
        &self,
        state: &mut ConversationState,
        text: &str,
    ) -> Vec<OutboundMessage> {
        state.last_activity = Utc::now();

        match state.phase {
            DialogPhase::AwaitFirstMessage => self.first_turn(state, text).await,
            DialogPhase::AwaitMenuChoice => self.menu_turn(state, text).await,
            DialogPhase::InSubflow(kind) => self.subflow_turn(state, kind, text).await,
        }
    }

    async fn first_turn(&self, state: &mut ConversationState, text: &str) -> Vec<OutboundMessage> {
        let Some(caps) = &self.capabilities else {
            // Setup error: instructional message, no transition. The next
            // attempt re-enters this same phase.
            warn!("capability settings missing; refusing to start dialog");
            return vec![OutboundMessage::text(
                Locale::English.strings().setup_missing,
            )];
        };

        match self.resolve_locale(state, text, caps).await {
            Ok(locale) => {
                state.locale = locale;
                state.phase = DialogPhase::AwaitMenuChoice;
                info!("conversation started in locale {}", locale.code());
                vec![OutboundMessage::text(render_menu(
                    locale.strings().welcome,
                    locale,
                    state.channel,
                ))]
            }
            Err(e) => {
                // Fatal for the turn. The code stays unset so the next
                // message retries detection.
                warn!("language detection failed: {}", e);
                vec![OutboundMessage::text(
                    Locale::English.strings().detection_failed,
                )]
            }
        }
    }

    async fn menu_turn(&self, state: &mut ConversationState, text: &str) -> Vec<OutboundMessage> {
        let Some(caps) = &self.capabilities else {
            return vec![OutboundMessage::text(
                Locale::English.strings().setup_missing,
            )];
        };

        let locale = match self.resolve_locale(state, text, caps).await {
            Ok(locale) => locale,
            Err(e) => {
                warn!("language detection failed: {}", e);
                return vec![OutboundMessage::text(
                    Locale::English.strings().detection_failed,
                )];
            }
        };
        state.locale = locale;

        match match_choice(text, state.channel) {
            Some(choice) => {
                let (kind, prompt) = subflow::dispatch(choice, locale);
                state.phase = DialogPhase::InSubflow(kind);
                info!("dispatched {:?} sub-flow", kind);
                vec![prompt]
            }
            None => match self.policy {
                UnrecognizedReplyPolicy::Silent => {
                    info!("unrecognized menu reply; awaiting another");
                    Vec::new()
                }
                UnrecognizedReplyPolicy::Reprompt => vec![OutboundMessage::text(render_menu(
                    locale.strings().new_question,
                    locale,
                    state.channel,
                ))],
            },
        }
    }

    async fn subflow_turn(
        &self,
        state: &mut ConversationState,
        kind: SubflowKind,
        text: &str,
    ) -> Vec<OutboundMessage> {
        let Some(caps) = &self.capabilities else {
            return vec![OutboundMessage::text(
                Locale::English.strings().setup_missing,
            )];
        };

        let locale = match self.resolve_locale(state, text, caps).await {
            Ok(locale) => locale,
            Err(e) => {
                warn!("language detection failed: {}", e);
                return vec![OutboundMessage::text(
                    Locale::English.strings().detection_failed,
                )];
            }
        };
        state.locale = locale;

        match subflow::step(kind, text, locale, caps.answers.as_ref()).await {
            SubflowStep::Continue { reply } => vec![reply],
            SubflowStep::Complete {
                reply,
                locale_override,
            } => {
                if let Some(chosen) = locale_override {
                    // Explicit overwrite by the language-change sub-flow;
                    // the next turn's recomputation will agree with this.
                    state.detected_language_code = Some(chosen.code().to_string());
                    state.locale = chosen;
                    info!("conversation locale changed to {}", chosen.code());
                }

                let locale = state.locale;
                state.phase = DialogPhase::AwaitMenuChoice;
                vec![
                    reply,
                    OutboundMessage::text(render_menu(
                        locale.strings().new_question,
                        locale,
                        state.channel,
                    )),
                ]
            }
        }
    }

    /// Build the one-time welcome card sent when a conversation opens.
    ///
    /// Always rendered from the English string set, regardless of the
    /// locale the conversation later detects.
    pub fn welcome_card() -> OutboundMessage {
        let strings = Locale::English.strings();
        OutboundMessage::Card {
            card: HeroCard {
                title: strings.welcome_title.to_string(),
                subtitle: "Hello. Hola. 你好. Bonjour.".to_string(),
                text: "Say \"hi\" to begin, diga \"hola\" para comenzar, 说“嗨”开始, \
dites \"Bonjour\" pour commencer"
                    .to_string(),
                image_url: strings.welcome_image_url.to_string(),
            },
        }
    }

    /// Resolve the conversation's working locale.
    ///
    /// With a stored code this is a pure table lookup; otherwise the
    /// detection capability runs once and its code is persisted, so repeated
    /// turns never detect twice.
    async fn resolve_locale(
        &self,
        state: &mut ConversationState,
        text: &str,
        caps: &Capabilities,
    ) -> Result<Locale, BotError> {
        if let Some(code) = &state.detected_language_code {
            DetectionMetrics::global().record_code_reuse();
            return Ok(Locale::from_code(code));
        }

        DetectionMetrics::global().record_detector_call();
        match caps.detector.detect(text).await {
            Ok(code) => {
                let locale = Locale::from_code(&code);
                state.detected_language_code = Some(code);
                Ok(locale)
            }
            Err(e) => {
                DetectionMetrics::global().record_detector_failure();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Detector that always reports a fixed code and counts its calls.
    struct FakeDetector {
        code: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LanguageDetector for FakeDetector {
        async fn detect(&self, _text: &str) -> Result<String, BotError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.code {
                Some(code) => Ok(code.to_string()),
                None => Err(BotError::Detection("unreachable".to_string())),
            }
        }
    }

    /// Answer source that always answers the same thing.
    struct FakeAnswers {
        answer: Option<&'static str>,
    }

    #[async_trait]
    impl AnswerSource for FakeAnswers {
        async fn best_answer(
            &self,
            _question: &str,
            _locale: Locale,
        ) -> Result<Option<String>, BotError> {
            Ok(self.answer.map(str::to_string))
        }
    }

    fn dialog_with(
        code: Option<&'static str>,
        answer: Option<&'static str>,
    ) -> (Dialog, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let dialog = Dialog::new(Some(Capabilities {
            detector: Arc::new(FakeDetector {
                code,
                calls: Arc::clone(&calls),
            }),
            answers: Arc::new(FakeAnswers { answer }),
        }));
        (dialog, calls)
    }

    fn text_of(message: &OutboundMessage) -> &str {
        match message {
            OutboundMessage::Text { text } => text,
            OutboundMessage::Card { .. } => panic!("expected text message"),
        }
    }

    // ==================== Scenario A: First Turn ====================

    #[tokio::test]
    #[serial]
    async fn test_first_message_detects_once_and_presents_menu() {
        let (dialog, calls) = dialog_with(Some("en"), None);
        let mut state = ConversationState::new(ChannelKind::Chat);

        let out = dialog.handle_turn(&mut state, "hi").await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.phase, DialogPhase::AwaitMenuChoice);
        assert_eq!(state.detected_language_code.as_deref(), Some("en"));
        assert_eq!(state.locale, Locale::English);

        assert_eq!(out.len(), 1);
        let prompt = text_of(&out[0]);
        assert!(prompt.starts_with("Welcome!"));
        assert_eq!(prompt.lines().count(), 3); // prompt + two choices
        assert!(prompt.contains("Get Answers"));
        assert!(prompt.contains("Select Language"));
    }

    #[tokio::test]
    #[serial]
    async fn test_first_message_localizes_welcome_to_detected_locale() {
        let (dialog, _) = dialog_with(Some("es"), None);
        let mut state = ConversationState::new(ChannelKind::Chat);

        let out = dialog.handle_turn(&mut state, "hola").await;

        assert_eq!(state.locale, Locale::Spanish);
        let prompt = text_of(&out[0]);
        assert!(prompt.starts_with("¡Bienvenido!"));
        assert!(prompt.contains("Obtener Respuestas"));
    }

    #[tokio::test]
    #[serial]
    async fn test_detection_happens_at_most_once() {
        let (dialog, calls) = dialog_with(Some("fr"), Some("answer"));
        let mut state = ConversationState::new(ChannelKind::Chat);

        dialog.handle_turn(&mut state, "bonjour").await;
        dialog.handle_turn(&mut state, "obtenir les réponses").await;
        dialog.handle_turn(&mut state, "où est la mairie ?").await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.locale, Locale::French);
    }

    // ==================== Scenario B: Menu → Q&A Sub-flow ====================

    #[tokio::test]
    #[serial]
    async fn test_spanish_reply_dispatches_qna_and_returns_to_menu() {
        let (dialog, _) = dialog_with(Some("es"), Some("Llame al 311."));
        let mut state = ConversationState::new(ChannelKind::Chat);

        dialog.handle_turn(&mut state, "hola").await;

        let out = dialog.handle_turn(&mut state, "Obtener Respuestas").await;
        assert_eq!(state.phase, DialogPhase::InSubflow(SubflowKind::GetAnswers));
        assert_eq!(out.len(), 1);
        assert_eq!(text_of(&out[0]), "¿Cuál es su pregunta?");

        let out = dialog.handle_turn(&mut state, "¿dónde pago impuestos?").await;
        assert_eq!(state.phase, DialogPhase::AwaitMenuChoice);
        assert_eq!(out.len(), 2);
        assert_eq!(text_of(&out[0]), "Llame al 311.");
        let reprompt = text_of(&out[1]);
        assert!(reprompt.starts_with("¿Tiene otra pregunta?"));
        assert!(reprompt.contains("Obtener Respuestas"));
    }

    // ==================== Scenario C: SMS Shortcuts ====================

    #[tokio::test]
    #[serial]
    async fn test_sms_numeric_shortcut_without_detection_call() {
        let (dialog, calls) = dialog_with(Some("xx"), None);
        let mut state = ConversationState::new(ChannelKind::Sms);
        state.detected_language_code = Some("fr".to_string());
        state.phase = DialogPhase::AwaitMenuChoice;

        let out = dialog.handle_turn(&mut state, "2").await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(state.locale, Locale::French);
        assert_eq!(state.phase, DialogPhase::InSubflow(SubflowKind::SetLanguage));
        assert!(text_of(&out[0]).starts_with("Veuillez choisir votre langue :"));
    }

    #[tokio::test]
    #[serial]
    async fn test_sms_menu_uses_shortcut_variants() {
        let (dialog, _) = dialog_with(Some("en"), None);
        let mut state = ConversationState::new(ChannelKind::Sms);

        let out = dialog.handle_turn(&mut state, "hi").await;
        let prompt = text_of(&out[0]);
        assert!(prompt.contains("1 - Get Answers"));
        assert!(prompt.contains("2 - Select Language"));
    }

    // ==================== Language Change ====================

    #[tokio::test]
    #[serial]
    async fn test_language_change_overwrites_code_and_relocalizes() {
        let (dialog, _) = dialog_with(Some("en"), None);
        let mut state = ConversationState::new(ChannelKind::Chat);

        dialog.handle_turn(&mut state, "hi").await;
        dialog.handle_turn(&mut state, "Select Language").await;
        let out = dialog.handle_turn(&mut state, "2").await;

        assert_eq!(state.detected_language_code.as_deref(), Some("es"));
        assert_eq!(state.locale, Locale::Spanish);
        assert_eq!(state.phase, DialogPhase::AwaitMenuChoice);

        assert_eq!(out.len(), 2);
        assert_eq!(
            text_of(&out[0]),
            "Idioma actualizado. Continuaremos en español."
        );
        // The ask-again prompt is already in the new locale.
        assert!(text_of(&out[1]).starts_with("¿Tiene otra pregunta?"));

        // And the next turn keeps rendering Spanish.
        let out = dialog.handle_turn(&mut state, "Obtener Respuestas").await;
        assert_eq!(text_of(&out[0]), "¿Cuál es su pregunta?");
    }

    // ==================== Unrecognized Replies ====================

    #[tokio::test]
    #[serial]
    async fn test_unrecognized_reply_is_silent_by_default() {
        let (dialog, _) = dialog_with(Some("en"), None);
        let mut state = ConversationState::new(ChannelKind::Chat);

        dialog.handle_turn(&mut state, "hi").await;
        let out = dialog.handle_turn(&mut state, "banana").await;

        assert!(out.is_empty());
        assert_eq!(state.phase, DialogPhase::AwaitMenuChoice);
    }

    #[tokio::test]
    #[serial]
    async fn test_unrecognized_reply_reprompts_under_policy() {
        let (dialog, _) = dialog_with(Some("en"), None);
        let dialog = dialog.with_policy(UnrecognizedReplyPolicy::Reprompt);
        let mut state = ConversationState::new(ChannelKind::Chat);

        dialog.handle_turn(&mut state, "hi").await;
        let out = dialog.handle_turn(&mut state, "banana").await;

        assert_eq!(out.len(), 1);
        assert!(text_of(&out[0]).contains("Get Answers"));
        assert_eq!(state.phase, DialogPhase::AwaitMenuChoice);
    }

    // ==================== Failure Paths ====================

    #[tokio::test]
    #[serial]
    async fn test_missing_capabilities_refuse_to_start() {
        let dialog = Dialog::new(None);
        let mut state = ConversationState::new(ChannelKind::Chat);

        let out = dialog.handle_turn(&mut state, "hi").await;

        assert_eq!(state.phase, DialogPhase::AwaitFirstMessage);
        assert!(state.detected_language_code.is_none());
        assert!(text_of(&out[0]).contains("DETECTION_ENDPOINT"));
    }

    #[tokio::test]
    #[serial]
    async fn test_detection_failure_leaves_code_unset_and_retries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dialog = Dialog::new(Some(Capabilities {
            detector: Arc::new(FakeDetector {
                code: None,
                calls: Arc::clone(&calls),
            }),
            answers: Arc::new(FakeAnswers { answer: None }),
        }));
        let mut state = ConversationState::new(ChannelKind::Chat);

        let out = dialog.handle_turn(&mut state, "hi").await;
        assert_eq!(state.phase, DialogPhase::AwaitFirstMessage);
        assert!(state.detected_language_code.is_none());
        assert_eq!(
            text_of(&out[0]),
            Locale::English.strings().detection_failed
        );

        // The next message retries detection.
        dialog.handle_turn(&mut state, "hi again").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    #[serial]
    async fn test_unknown_detected_code_falls_back_to_english() {
        let (dialog, _) = dialog_with(Some("de"), None);
        let mut state = ConversationState::new(ChannelKind::Chat);

        let out = dialog.handle_turn(&mut state, "hallo").await;

        assert_eq!(state.locale, Locale::English);
        assert_eq!(state.detected_language_code.as_deref(), Some("de"));
        assert!(text_of(&out[0]).starts_with("Welcome!"));
    }

    // ==================== Phase Monotonicity ====================

    #[tokio::test]
    #[serial]
    async fn test_never_returns_to_await_first_message() {
        let (dialog, _) = dialog_with(Some("en"), Some("answer"));
        let mut state = ConversationState::new(ChannelKind::Chat);

        dialog.handle_turn(&mut state, "hi").await;
        for reply in ["get answers", "a question", "select language", "1", "banana"] {
            dialog.handle_turn(&mut state, reply).await;
            assert_ne!(state.phase, DialogPhase::AwaitFirstMessage);
        }
    }
}
