//! Restore locked zones of a candidate document from the base template

use tracing::debug;

use super::extract::{extract_locked_zones, extract_locked_zones_lenient};
use crate::error::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairResult {
    pub repaired_html: String,
    pub repaired_count: usize,
}

/// Overwrite every drifted locked zone of `candidate` with the base value.
///
/// A zone the candidate no longer contains cannot be located and is left for
/// the validator to report. Only the first occurrence of the drifted text is
/// replaced.
pub fn repair_locked_zones(base: &str, candidate: &str) -> Result<RepairResult, TemplateError> {
    let base_zones = extract_locked_zones(base)?;
    let candidate_zones = extract_locked_zones_lenient(candidate);

    let mut repaired_html = candidate.to_string();
    let mut repaired_count = 0;

    for (base_zone, (key, candidate_value)) in base_zones.iter().zip(candidate_zones) {
        let Some(candidate_value) = candidate_value else {
            continue;
        };
        if candidate_value == base_zone.value {
            continue;
        }

        debug!(zone = %key, "Restoring locked zone");
        repaired_html = repaired_html.replacen(&candidate_value, &base_zone.value, 1);
        repaired_count += 1;
    }

    Ok(RepairResult {
        repaired_html,
        repaired_count,
    })
}
