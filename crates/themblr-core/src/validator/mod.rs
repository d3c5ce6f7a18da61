//! Theme contract validation
//!
//! Runs every check against a serialized document and aggregates the results.
//! No check short-circuits another, so the report always lists the full set.

pub mod checks;
pub mod patterns;

pub use checks::{default_checks, CheckOutcome, ThemeCheck};

use themblr_types::{ValidationCheck, ValidationResult};
use tracing::debug;

use crate::contracts::{MAX_INLINE_SCRIPT_WARNING_CHARS, MAX_THEME_BYTES_WARNING};

/// Inputs to the validator besides the document itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    /// Lang keys of the base template; the recommended set is used when empty
    pub base_lang_keys: Vec<String>,
    pub max_theme_bytes: usize,
    pub max_inline_script_chars: usize,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            base_lang_keys: Vec::new(),
            max_theme_bytes: MAX_THEME_BYTES_WARNING,
            max_inline_script_chars: MAX_INLINE_SCRIPT_WARNING_CHARS,
        }
    }
}

impl ValidationContext {
    pub fn with_lang_keys(base_lang_keys: Vec<String>) -> Self {
        Self {
            base_lang_keys,
            ..Self::default()
        }
    }
}

/// Validates documents against a fixed list of checks
pub struct ThemeValidator {
    checks: Vec<Box<dyn ThemeCheck>>,
}

impl Default for ThemeValidator {
    fn default() -> Self {
        Self {
            checks: default_checks(),
        }
    }
}

impl ThemeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_ids(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.id()).collect()
    }

    pub fn validate(&self, html: &str, context: &ValidationContext) -> ValidationResult {
        let checks: Vec<ValidationCheck> = self
            .checks
            .iter()
            .map(|check| {
                let outcome = check.check(html, context);
                ValidationCheck {
                    id: check.id().to_string(),
                    passed: outcome.passed,
                    severity: check.severity(),
                    message: outcome.message,
                    details: outcome.details,
                }
            })
            .collect();

        let result = ValidationResult::from_checks(checks);
        debug!(
            passed = result.passed,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Validated theme"
        );
        result
    }
}

/// Validate with the default check list
pub fn validate_theme_html(html: &str, context: &ValidationContext) -> ValidationResult {
    ThemeValidator::default().validate(html, context)
}
