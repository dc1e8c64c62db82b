//! Main-menu construction and reply classification.
//!
//! Both directions are data-driven: the menu builder reads display strings
//! from the locale tables, and the matcher iterates a fixed
//! (intent, locale) → canonical-phrase table. Adding a locale or an intent
//! touches data, not control flow.

use crate::channel::ChannelKind;
use crate::i18n::Locale;

/// A main-menu intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    GetAnswers,
    SetLanguage,
}

impl MenuChoice {
    /// Localized display string for this choice.
    pub fn display(&self, locale: Locale, channel: ChannelKind) -> &'static str {
        let strings = locale.strings();
        match (self, channel.is_sms()) {
            (MenuChoice::GetAnswers, false) => strings.get_answers,
            (MenuChoice::GetAnswers, true) => strings.sms_get_answers,
            (MenuChoice::SetLanguage, false) => strings.set_language,
            (MenuChoice::SetLanguage, true) => strings.sms_set_language,
        }
    }
}

/// Canonical phrases recognized by the matcher, scanned in this exact order:
/// Get-Answers in en, es, fr, zh, then Select-Language in en, es, fr, zh.
/// Users may reply in a different script than the active prompt (e.g. after
/// a channel auto-switch), so every locale's phrases are always live.
const CHOICE_PHRASES: [(MenuChoice, Locale, &str); 8] = [
    (MenuChoice::GetAnswers, Locale::English, "get answers"),
    (MenuChoice::GetAnswers, Locale::Spanish, "obtener respuestas"),
    (MenuChoice::GetAnswers, Locale::French, "obtenir les réponses"),
    (MenuChoice::GetAnswers, Locale::Chinese, "其他问题"),
    (MenuChoice::SetLanguage, Locale::English, "select language"),
    (MenuChoice::SetLanguage, Locale::Spanish, "seleccione el idioma"),
    (MenuChoice::SetLanguage, Locale::French, "sélectionner la langue"),
    (MenuChoice::SetLanguage, Locale::Chinese, "选择语言"),
];

/// Build the ordered pair of menu choice strings for a locale and channel.
///
/// Pure and total over all (locale, channel) combinations. SMS channels get
/// the numeric-shortcut variants.
pub fn build_menu(locale: Locale, channel: ChannelKind) -> [&'static str; 2] {
    [
        MenuChoice::GetAnswers.display(locale, channel),
        MenuChoice::SetLanguage.display(locale, channel),
    ]
}

/// Render the menu as the reply text presented under a prompt.
pub fn render_menu(prompt: &str, locale: Locale, channel: ChannelKind) -> String {
    let [first, second] = build_menu(locale, channel);
    format!("{}\n{}\n{}", prompt, first, second)
}

/// Classify a free-text or numeric reply into a menu intent.
///
/// On SMS channels the numeric shortcuts "1" and "2" are checked before the
/// phrase scan. The phrase scan is a case-insensitive substring containment
/// over every locale's canonical phrases; first match wins. `None` means the
/// reply is unrecognized, which is not an error.
pub fn match_choice(reply: &str, channel: ChannelKind) -> Option<MenuChoice> {
    if channel.is_sms() {
        match reply.trim() {
            "1" => return Some(MenuChoice::GetAnswers),
            "2" => return Some(MenuChoice::SetLanguage),
            _ => {}
        }
    }

    let reply = reply.to_lowercase();
    CHOICE_PHRASES
        .iter()
        .find(|(_, _, phrase)| reply.contains(phrase))
        .map(|(choice, _, _)| *choice)
}
