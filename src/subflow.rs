//! Sub-flows dispatched from the main menu.
//!
//! A sub-flow is an explicit state value carried inside the dialog phase,
//! stepped one inbound message at a time. Completion is a returned signal
//! the orchestrator acts on; there is no implicit stack resumption. At most
//! one sub-flow is in flight per conversation, enforced structurally by the
//! phase enum.

use crate::channel::OutboundMessage;
use crate::i18n::Locale;
use crate::menu::MenuChoice;
use crate::qna::AnswerSource;
use tracing::warn;

/// The active sub-flow of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubflowKind {
    /// Q&A lookup: awaiting the user's question.
    GetAnswers,
    /// Language change: awaiting the user's locale pick.
    SetLanguage,
}

/// Result of stepping a sub-flow with one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubflowStep {
    /// The sub-flow consumed the message and awaits another.
    Continue { reply: OutboundMessage },
    /// The sub-flow finished. `locale_override` carries a new language code
    /// choice for the orchestrator to persist before the next turn.
    Complete {
        reply: OutboundMessage,
        locale_override: Option<Locale>,
    },
}

/// Start the sub-flow for a menu choice, producing its opening prompt.
pub fn dispatch(choice: MenuChoice, locale: Locale) -> (SubflowKind, OutboundMessage) {
    match choice {
        MenuChoice::GetAnswers => (
            SubflowKind::GetAnswers,
            OutboundMessage::text(locale.strings().ask_question),
        ),
        MenuChoice::SetLanguage => (
            SubflowKind::SetLanguage,
            OutboundMessage::text(render_locale_list(locale)),
        ),
    }
}

/// Step the active sub-flow with one inbound message.
///
/// Failures inside a sub-flow are the sub-flow's own responsibility: a Q&A
/// capability error surfaces as the localized no-answer reply and the flow
/// still completes, so control always returns to the menu.
pub async fn step(
    kind: SubflowKind,
    text: &str,
    locale: Locale,
    answers: &dyn AnswerSource,
) -> SubflowStep {
    match kind {
        SubflowKind::GetAnswers => step_get_answers(text, locale, answers).await,
        SubflowKind::SetLanguage => step_set_language(text, locale),
    }
}

async fn step_get_answers(
    question: &str,
    locale: Locale,
    answers: &dyn AnswerSource,
) -> SubflowStep {
    let reply = match answers.best_answer(question, locale).await {
        Ok(Some(answer)) => answer,
        Ok(None) => locale.strings().no_answer_found.to_string(),
        Err(e) => {
            warn!("q&a capability failed: {}", e);
            locale.strings().no_answer_found.to_string()
        }
    };

    SubflowStep::Complete {
        reply: OutboundMessage::text(reply),
        locale_override: None,
    }
}

fn step_set_language(pick: &str, locale: Locale) -> SubflowStep {
    match parse_locale_pick(pick) {
        Some(chosen) => SubflowStep::Complete {
            // Confirm in the NEW locale; the orchestrator persists the code.
            reply: OutboundMessage::text(chosen.strings().language_changed),
            locale_override: Some(chosen),
        },
        None => SubflowStep::Continue {
            reply: OutboundMessage::text(render_locale_list(locale)),
        },
    }
}

/// Render the numbered locale list under the localized prompt.
fn render_locale_list(locale: Locale) -> String {
    let mut out = String::from(locale.strings().choose_language);
    for (i, candidate) in Locale::ALL.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", i + 1, candidate.native_name()));
    }
    out
}

/// Parse a locale pick: a list number, or a native/English language name.
fn parse_locale_pick(pick: &str) -> Option<Locale> {
    let trimmed = pick.trim();

    if let Ok(n) = trimmed.parse::<usize>() {
        return Locale::ALL.get(n.checked_sub(1)?).copied();
    }

    let lowered = trimmed.to_lowercase();
    Locale::ALL.into_iter().find(|candidate| {
        lowered.contains(&candidate.native_name().to_lowercase())
            || lowered.contains(&candidate.name().to_lowercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted answer source for sub-flow tests.
    struct FakeAnswers {
        response: Result<Option<String>, ()>,
        calls: AtomicUsize,
    }

    impl FakeAnswers {
        fn answering(answer: &str) -> Self {
            Self {
                response: Ok(Some(answer.to_string())),
                calls: AtomicUsize::new(0),
            }
        }

        fn empty() -> Self {
            Self {
                response: Ok(None),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AnswerSource for FakeAnswers {
        async fn best_answer(
            &self,
            _question: &str,
            _locale: Locale,
        ) -> Result<Option<String>, BotError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(answer) => Ok(answer.clone()),
                Err(()) => Err(BotError::Qna("down".to_string())),
            }
        }
    }

    // ==================== Dispatch Tests ====================

    #[test]
    fn test_dispatch_get_answers_prompts_for_question() {
        let (kind, prompt) = dispatch(MenuChoice::GetAnswers, Locale::Spanish);
        assert_eq!(kind, SubflowKind::GetAnswers);
        assert_eq!(
            prompt,
            OutboundMessage::text("¿Cuál es su pregunta?")
        );
    }

    #[test]
    fn test_dispatch_set_language_lists_all_locales() {
        let (kind, prompt) = dispatch(MenuChoice::SetLanguage, Locale::English);
        assert_eq!(kind, SubflowKind::SetLanguage);

        let OutboundMessage::Text { text } = prompt else {
            panic!("expected text prompt");
        };
        assert!(text.starts_with("Please choose your language:"));
        for native in ["English", "Español", "中文", "Français"] {
            assert!(text.contains(native));
        }
        assert!(text.contains("1. English"));
        assert!(text.contains("4. Français"));
    }

    // ==================== Get-Answers Step Tests ====================

    #[tokio::test]
    async fn test_get_answers_completes_with_answer() {
        let answers = FakeAnswers::answering("Dial 311.");
        let step = step(SubflowKind::GetAnswers, "how do I reach the city?", Locale::English, &answers).await;

        assert_eq!(
            step,
            SubflowStep::Complete {
                reply: OutboundMessage::text("Dial 311."),
                locale_override: None,
            }
        );
        assert_eq!(answers.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_answers_no_match_is_localized_notice() {
        let answers = FakeAnswers::empty();
        let step = step(SubflowKind::GetAnswers, "???", Locale::Spanish, &answers).await;

        let SubflowStep::Complete { reply, locale_override } = step else {
            panic!("expected completion");
        };
        assert_eq!(
            reply,
            OutboundMessage::text(Locale::Spanish.strings().no_answer_found)
        );
        assert!(locale_override.is_none());
    }

    #[tokio::test]
    async fn test_get_answers_capability_failure_still_completes() {
        let answers = FakeAnswers::failing();
        let step = step(SubflowKind::GetAnswers, "anything", Locale::French, &answers).await;

        assert_eq!(
            step,
            SubflowStep::Complete {
                reply: OutboundMessage::text(Locale::French.strings().no_answer_found),
                locale_override: None,
            }
        );
    }

    // ==================== Set-Language Step Tests ====================

    #[tokio::test]
    async fn test_set_language_by_number() {
        let answers = FakeAnswers::empty();
        let step = step(SubflowKind::SetLanguage, "3", Locale::English, &answers).await;

        assert_eq!(
            step,
            SubflowStep::Complete {
                reply: OutboundMessage::text(Locale::Chinese.strings().language_changed),
                locale_override: Some(Locale::Chinese),
            }
        );
        // The language-change flow never touches the Q&A capability.
        assert_eq!(answers.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_set_language_by_native_name() {
        let answers = FakeAnswers::empty();
        let step = step(SubflowKind::SetLanguage, "español por favor", Locale::English, &answers).await;

        let SubflowStep::Complete { locale_override, .. } = step else {
            panic!("expected completion");
        };
        assert_eq!(locale_override, Some(Locale::Spanish));
    }

    #[tokio::test]
    async fn test_set_language_confirms_in_new_locale() {
        let answers = FakeAnswers::empty();
        let step = step(SubflowKind::SetLanguage, "Français", Locale::English, &answers).await;

        let SubflowStep::Complete { reply, locale_override } = step else {
            panic!("expected completion");
        };
        assert_eq!(locale_override, Some(Locale::French));
        assert_eq!(
            reply,
            OutboundMessage::text("Langue mise à jour. Nous continuerons en français.")
        );
    }

    #[tokio::test]
    async fn test_set_language_unparseable_pick_reprompts() {
        let answers = FakeAnswers::empty();
        let step = step(SubflowKind::SetLanguage, "klingon", Locale::Spanish, &answers).await;

        let SubflowStep::Continue { reply } = step else {
            panic!("expected continuation");
        };
        let OutboundMessage::Text { text } = reply else {
            panic!("expected text reply");
        };
        assert!(text.starts_with(Locale::Spanish.strings().choose_language));
    }

    #[tokio::test]
    async fn test_set_language_out_of_range_number_reprompts() {
        let answers = FakeAnswers::empty();
        let step = step(SubflowKind::SetLanguage, "7", Locale::English, &answers).await;
        assert!(matches!(step, SubflowStep::Continue { .. }));

        let step = step_set_language("0", Locale::English);
        assert!(matches!(step, SubflowStep::Continue { .. }));
    }

    // ==================== Pick Parsing Tests ====================

    #[test]
    fn test_parse_locale_pick_numbers() {
        assert_eq!(parse_locale_pick("1"), Some(Locale::English));
        assert_eq!(parse_locale_pick("2"), Some(Locale::Spanish));
        assert_eq!(parse_locale_pick("3"), Some(Locale::Chinese));
        assert_eq!(parse_locale_pick("4"), Some(Locale::French));
        assert_eq!(parse_locale_pick("5"), None);
        assert_eq!(parse_locale_pick("0"), None);
    }

    #[test]
    fn test_parse_locale_pick_names() {
        assert_eq!(parse_locale_pick("English"), Some(Locale::English));
        assert_eq!(parse_locale_pick("chinese"), Some(Locale::Chinese));
        assert_eq!(parse_locale_pick("中文"), Some(Locale::Chinese));
        assert_eq!(parse_locale_pick("  français "), Some(Locale::French));
        assert_eq!(parse_locale_pick("dothraki"), None);
    }
}
