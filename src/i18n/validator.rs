//! String-table validation module.
//!
//! Missing or malformed localized strings must surface at build/test time,
//! never at runtime. The validator walks every field of a locale's
//! [`LocaleStrings`](crate::i18n::LocaleStrings) table and reports anything a
//! release should not ship with.

use crate::i18n::{Locale, LocaleStrings};

/// Validation report containing errors and warnings about a string table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Critical problems: the table must not ship with any of these
    pub errors: Vec<String>,

    /// Non-critical observations worth a look
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for localized string tables.
pub struct StringTableValidator;

impl StringTableValidator {
    /// Validate one locale's string table.
    ///
    /// Checks that:
    /// - every field is non-empty (the key set is closed; an empty entry is a
    ///   missing translation)
    /// - the SMS menu variants carry their numeric reply shortcut and differ
    ///   from the standard variants
    /// - the welcome-card image URL is an https URL
    ///
    /// # Arguments
    /// * `locale` - The locale whose table to validate
    ///
    /// # Returns
    /// A `ValidationReport` containing any errors or warnings found.
    pub fn validate(locale: Locale) -> ValidationReport {
        let mut report = ValidationReport::new();
        let strings = locale.strings();

        for (key, value) in Self::entries(strings) {
            if value.trim().is_empty() {
                report
                    .errors
                    .push(format!("{}: '{}' is empty", locale.code(), key));
            }
        }

        if !strings.sms_get_answers.starts_with('1') {
            report.errors.push(format!(
                "{}: sms_get_answers must carry the '1' shortcut, got '{}'",
                locale.code(),
                strings.sms_get_answers
            ));
        }
        if !strings.sms_set_language.starts_with('2') {
            report.errors.push(format!(
                "{}: sms_set_language must carry the '2' shortcut, got '{}'",
                locale.code(),
                strings.sms_set_language
            ));
        }

        if strings.sms_get_answers == strings.get_answers {
            report.warnings.push(format!(
                "{}: SMS Get-Answers variant is identical to the standard one",
                locale.code()
            ));
        }
        if strings.sms_set_language == strings.set_language {
            report.warnings.push(format!(
                "{}: SMS Select-Language variant is identical to the standard one",
                locale.code()
            ));
        }

        if !strings.welcome_image_url.starts_with("https://") {
            report.errors.push(format!(
                "{}: welcome_image_url must be https, got '{}'",
                locale.code(),
                strings.welcome_image_url
            ));
        }

        report
    }

    /// Validate every supported locale at once.
    pub fn validate_all() -> ValidationReport {
        let mut combined = ValidationReport::new();
        for locale in Locale::ALL {
            let report = Self::validate(locale);
            combined.errors.extend(report.errors);
            combined.warnings.extend(report.warnings);
        }
        combined
    }

    /// Enumerate every (key, value) pair of a table.
    ///
    /// Exhaustive by construction: destructuring the struct means a new field
    /// cannot be added without updating this list.
    fn entries(strings: &LocaleStrings) -> [(&'static str, &'static str); 14] {
        let LocaleStrings {
            welcome,
            new_question,
            get_answers,
            set_language,
            sms_get_answers,
            sms_set_language,
            ask_question,
            no_answer_found,
            choose_language,
            language_changed,
            detection_failed,
            setup_missing,
            welcome_title,
            welcome_image_url,
        } = *strings;

        [
            ("welcome", welcome),
            ("new_question", new_question),
            ("get_answers", get_answers),
            ("set_language", set_language),
            ("sms_get_answers", sms_get_answers),
            ("sms_set_language", sms_set_language),
            ("ask_question", ask_question),
            ("no_answer_found", no_answer_found),
            ("choose_language", choose_language),
            ("language_changed", language_changed),
            ("detection_failed", detection_failed),
            ("setup_missing", setup_missing),
            ("welcome_title", welcome_title),
            ("welcome_image_url", welcome_image_url),
        ]
    }
}
