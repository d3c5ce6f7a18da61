//! How far a candidate CSS core moved away from the base

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

fn normalize_css(css: &str) -> Vec<char> {
    WHITESPACE_RUN.replace_all(css, " ").trim().chars().collect()
}

/// Positional difference ratio in `[0, 1]` after whitespace normalization.
///
/// Counts mismatching characters over the common prefix length plus the
/// length difference, divided by the longer length.
pub fn css_change_ratio(base_css: &str, candidate_css: &str) -> f64 {
    let base = normalize_css(base_css);
    let candidate = normalize_css(candidate_css);

    let max_len = base.len().max(candidate.len()).max(1);
    let mismatches = base
        .iter()
        .zip(candidate.iter())
        .filter(|(a, b)| a != b)
        .count();
    let diff = mismatches + base.len().abs_diff(candidate.len());

    diff as f64 / max_len as f64
}
