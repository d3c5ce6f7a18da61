//! Runtime configuration loaded from the environment

use std::path::PathBuf;
use std::time::Duration;

use crate::contracts::{MAX_INLINE_SCRIPT_WARNING_CHARS, MAX_THEME_BYTES_WARNING};
use crate::validator::ValidationContext;
use crate::zones::ThresholdMergePolicy;

pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_MIN_CSS_CHANGE_RATIO: f64 = 0.12;

#[derive(Debug, Clone, PartialEq)]
pub struct ThemblrConfig {
    /// Explicit starter theme location, tried before the built-in candidates
    pub starter_theme_path: Option<PathBuf>,
    /// Budget for one collaborator call
    pub generation_timeout_ms: u64,
    /// First-pass CSS below this change ratio triggers a distinctness retry
    pub min_css_change_ratio: f64,
    pub merge_policy: ThresholdMergePolicy,
    pub max_theme_bytes: usize,
    pub max_inline_script_chars: usize,
}

impl Default for ThemblrConfig {
    fn default() -> Self {
        Self {
            starter_theme_path: None,
            generation_timeout_ms: DEFAULT_GENERATION_TIMEOUT_MS,
            min_css_change_ratio: DEFAULT_MIN_CSS_CHANGE_RATIO,
            merge_policy: ThresholdMergePolicy::default(),
            max_theme_bytes: MAX_THEME_BYTES_WARNING,
            max_inline_script_chars: MAX_INLINE_SCRIPT_WARNING_CHARS,
        }
    }
}

fn positive_int<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
        .unwrap_or(default)
}

fn positive_float(raw: Option<String>, default: f64) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

impl ThemblrConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    ///
    /// Non-numeric and non-positive values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            starter_theme_path: lookup("STARTER_THEME_PATH")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            generation_timeout_ms: positive_int(
                lookup("GENERATION_TIMEOUT_MS"),
                defaults.generation_timeout_ms,
            ),
            min_css_change_ratio: positive_float(
                lookup("THEMBLR_MIN_CSS_CHANGE_RATIO"),
                defaults.min_css_change_ratio,
            ),
            merge_policy: ThresholdMergePolicy {
                min_override_chars: positive_int(
                    lookup("THEMBLR_CSS_MERGE_MIN_CHARS"),
                    defaults.merge_policy.min_override_chars,
                ),
                min_base_ratio: positive_float(
                    lookup("THEMBLR_CSS_MERGE_MIN_BASE_RATIO"),
                    defaults.merge_policy.min_base_ratio,
                ),
            },
            max_theme_bytes: positive_int(lookup("THEMBLR_MAX_THEME_BYTES"), defaults.max_theme_bytes),
            max_inline_script_chars: positive_int(
                lookup("THEMBLR_MAX_INLINE_SCRIPT_CHARS"),
                defaults.max_inline_script_chars,
            ),
        }
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_timeout_ms)
    }

    /// Validation context for a template's lang keys under these thresholds
    pub fn validation_context(&self, base_lang_keys: Vec<String>) -> ValidationContext {
        ValidationContext {
            base_lang_keys,
            max_theme_bytes: self.max_theme_bytes,
            max_inline_script_chars: self.max_inline_script_chars,
        }
    }
}
