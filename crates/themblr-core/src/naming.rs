//! Output file naming

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;

const MAX_SLUG_CHARS: usize = 80;
const FALLBACK_SLUG: &str = "theme";

lazy_static! {
    static ref NON_ALPHANUMERIC_RUN: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Lowercase, collapse non-alphanumeric runs to `-`, trim dashes, cap length
pub fn normalize_slug(input: &str) -> String {
    let lowered = input.to_lowercase();
    let dashed = NON_ALPHANUMERIC_RUN.replace_all(lowered.trim(), "-");
    let trimmed = dashed.trim_matches('-');
    let capped: String = trimmed.chars().take(MAX_SLUG_CHARS).collect();

    if capped.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        capped
    }
}

/// `<slug>-<YYYY-MM-DD>-theme.html` for the given day
pub fn theme_file_name_on(slug: &str, date: NaiveDate) -> String {
    format!("{}-{}-theme.html", normalize_slug(slug), date.format("%Y-%m-%d"))
}

/// File name stamped with today's UTC date
pub fn build_theme_file_name(slug: &str) -> String {
    theme_file_name_on(slug, Utc::now().date_naive())
}
