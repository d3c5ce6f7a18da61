//! CSS override merge policy and contract backfill

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::contracts::{css_variable_fallback, REQUIRED_CSS_VARIABLES, REQUIRED_STABLE_HOOKS};

lazy_static! {
    /// One declaration pattern per required custom property
    static ref CSS_VARIABLE_DECLARATIONS: Vec<(&'static str, Regex)> = REQUIRED_CSS_VARIABLES
        .iter()
        .map(|(name, _)| {
            let pattern = format!(r"(?i){}\s*:", regex::escape(name));
            (*name, Regex::new(&pattern).unwrap())
        })
        .collect();
}

/// Required stable hooks that do not occur anywhere in `source`
pub fn missing_stable_hooks(source: &str) -> Vec<&'static str> {
    REQUIRED_STABLE_HOOKS
        .iter()
        .copied()
        .filter(|hook| !source.contains(hook))
        .collect()
}

/// Required custom properties with no declaration in `source`
pub fn missing_css_variables(source: &str) -> Vec<&'static str> {
    CSS_VARIABLE_DECLARATIONS
        .iter()
        .filter(|(_, pattern)| !pattern.is_match(source))
        .map(|(name, _)| *name)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingCssContracts {
    pub hooks: Vec<&'static str>,
    pub variables: Vec<&'static str>,
}

impl MissingCssContracts {
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty() && self.variables.is_empty()
    }
}

pub fn detect_missing_css_contracts(css: &str) -> MissingCssContracts {
    MissingCssContracts {
        hooks: missing_stable_hooks(css),
        variables: missing_css_variables(css),
    }
}

/// Minimal CSS declaring every missing variable and an empty rule per missing hook
pub fn build_css_contract_backfill(missing: &MissingCssContracts) -> String {
    let mut chunks = Vec::new();

    if !missing.variables.is_empty() {
        let declarations: Vec<String> = missing
            .variables
            .iter()
            .map(|name| format!("  {}: {};", name, css_variable_fallback(name)))
            .collect();
        chunks.push(format!(":root {{\n{}\n}}", declarations.join("\n")));
    }

    if !missing.hooks.is_empty() {
        let rules: Vec<String> = missing.hooks.iter().map(|hook| format!("{hook} {{}}")).collect();
        chunks.push(rules.join("\n"));
    }

    chunks.join("\n\n")
}

/// Decides whether a CSS override is appended to the base CSS core
/// instead of replacing it
pub trait CssMergePolicy: Send + Sync {
    fn should_merge(&self, base_css: &str, override_css: &str) -> bool;
}

/// Merge when the override is short, drops a contract, or is much smaller
/// than the base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdMergePolicy {
    pub min_override_chars: usize,
    pub min_base_ratio: f64,
}

impl Default for ThresholdMergePolicy {
    fn default() -> Self {
        Self {
            min_override_chars: 1200,
            min_base_ratio: 0.65,
        }
    }
}

impl CssMergePolicy for ThresholdMergePolicy {
    fn should_merge(&self, base_css: &str, override_css: &str) -> bool {
        let override_chars = override_css.chars().count();
        if override_chars < self.min_override_chars {
            return true;
        }

        if !detect_missing_css_contracts(override_css).is_empty() {
            return true;
        }

        let base_chars = base_css.chars().count();
        let floor = (base_chars as f64 * self.min_base_ratio).floor() as usize;
        override_chars < floor
    }
}
