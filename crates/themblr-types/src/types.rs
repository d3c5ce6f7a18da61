use crate::zones::EditableZoneKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks the pass/fail verdict
    Error,
    /// Reported, never fails the document
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationCheck {
    pub id: String, // e.g., "block-balance"
    pub passed: bool,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>, // Offending names, mismatched tags, ...
}

impl ValidationCheck {
    pub fn is_failed_error(&self) -> bool {
        !self.passed && self.severity == Severity::Error
    }

    pub fn is_failed_warning(&self) -> bool {
        !self.passed && self.severity == Severity::Warning
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub checks: Vec<ValidationCheck>,
}

impl ValidationResult {
    /// Aggregate a full check list into a verdict.
    ///
    /// `passed` is true iff no error-severity check failed.
    pub fn from_checks(checks: Vec<ValidationCheck>) -> Self {
        let errors: Vec<String> = checks
            .iter()
            .filter(|c| c.is_failed_error())
            .map(|c| c.message.clone())
            .collect();
        let warnings: Vec<String> = checks
            .iter()
            .filter(|c| c.is_failed_warning())
            .map(|c| c.message.clone())
            .collect();

        Self {
            passed: errors.is_empty(),
            errors,
            warnings,
            checks,
        }
    }

    pub fn check(&self, id: &str) -> Option<&ValidationCheck> {
        self.checks.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedZoneSummary {
    pub zone: EditableZoneKey,
    pub changed: bool,
    pub old_chars: usize,
    pub new_chars: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub locked_regions_repaired: usize,
    pub retry_count: usize,
    pub changed_regions: Vec<ChangedZoneSummary>,
}

/// Output of one generation run.
///
/// Always produced for a completed run, even when `validation.passed` is false.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub file_name: String,
    pub theme_html: String,
    pub validation: ValidationResult,
    pub report: GenerationReport,
}
