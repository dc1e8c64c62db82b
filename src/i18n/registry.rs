//! Locale registry: single source of truth for all supported locales.
//!
//! The locale set is closed. Every code path that derives a locale from a
//! detected-language code goes through [`Locale::from_code`], which is total:
//! anything outside the supported set maps to English.

use crate::i18n::strings::{
    LocaleStrings, CHINESE_STRINGS, ENGLISH_STRINGS, FRENCH_STRINGS, SPANISH_STRINGS,
};

/// A supported conversation locale.
///
/// Drives every localized string choice and the mapping from
/// detection-service language codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    English,
    Spanish,
    Chinese,
    French,
}

/// Metadata for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleInfo {
    /// ISO 639-1 language code (e.g., "en", "es")
    pub code: &'static str,

    /// English name of the language (e.g., "Spanish")
    pub name: &'static str,

    /// Native name of the language (e.g., "Español")
    pub native_name: &'static str,
}

impl Locale {
    /// All supported locales, in presentation order.
    pub const ALL: [Locale; 4] = [
        Locale::English,
        Locale::Spanish,
        Locale::Chinese,
        Locale::French,
    ];

    /// Derive a locale from a detection-service language code.
    ///
    /// Total over all inputs: "es", "zh" and "fr" map to their locales,
    /// everything else (including "en", empty, and garbage) maps to English.
    ///
    /// # Arguments
    /// * `code` - The ISO 639-1 language code reported by the detector
    pub fn from_code(code: &str) -> Locale {
        match code.trim() {
            "es" => Locale::Spanish,
            "zh" => Locale::Chinese,
            "fr" => Locale::French,
            _ => Locale::English,
        }
    }

    /// Metadata for this locale.
    pub fn info(&self) -> &'static LocaleInfo {
        match self {
            Locale::English => &LocaleInfo {
                code: "en",
                name: "English",
                native_name: "English",
            },
            Locale::Spanish => &LocaleInfo {
                code: "es",
                name: "Spanish",
                native_name: "Español",
            },
            Locale::Chinese => &LocaleInfo {
                code: "zh",
                name: "Chinese",
                native_name: "中文",
            },
            Locale::French => &LocaleInfo {
                code: "fr",
                name: "French",
                native_name: "Français",
            },
        }
    }

    /// The ISO 639-1 language code for this locale.
    pub fn code(&self) -> &'static str {
        self.info().code
    }

    /// The English name of this locale's language.
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// The native name of this locale's language.
    pub fn native_name(&self) -> &'static str {
        self.info().native_name
    }

    /// The localized string table for this locale.
    ///
    /// Lookup can never fail: the key set is the field set of
    /// [`LocaleStrings`], validated exhaustively in tests.
    pub fn strings(&self) -> &'static LocaleStrings {
        match self {
            Locale::English => &ENGLISH_STRINGS,
            Locale::Spanish => &SPANISH_STRINGS,
            Locale::Chinese => &CHINESE_STRINGS,
            Locale::French => &FRENCH_STRINGS,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::English
    }
}
