//! Internationalization (i18n) module for multi-language support.
//!
//! This module provides a centralized architecture for the closed set of
//! supported locales. All locale metadata, localized strings, and detection
//! observability live here.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported locales and the
//!   total code → locale mapping
//! - `strings`: Compile-time-validated localized string tables
//! - `validator`: Build/test-time string-table validation
//! - `metrics`: Detection observability counters
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::Locale;
//!
//! // Total mapping: unknown codes fall back to English
//! let locale = Locale::from_code("es");
//! let prompt = locale.strings().welcome;
//! ```

mod metrics;
mod registry;
mod strings;
mod validator;

pub use metrics::{DetectionMetrics, MetricsReport};
pub use registry::{Locale, LocaleInfo};
pub use strings::LocaleStrings;
pub use validator::{StringTableValidator, ValidationReport};
