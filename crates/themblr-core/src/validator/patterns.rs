//! Regex patterns and scanners used by the contract checks

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::contracts::CUSTOM_CSS_MARKER;

lazy_static! {
    static ref META_NAME: Regex =
        Regex::new(r#"(?i)<meta\s+[^>]*name=["']([^"']+)["'][^>]*>"#).unwrap();
    static ref HTML_OPEN_TAG: Regex = Regex::new(r"(?is)<html\b[^>]*>").unwrap();
    static ref INLINE_SCRIPT: Regex = Regex::new(r"(?is)<script([^>]*)>(.*?)</script>").unwrap();
    static ref SRC_ATTRIBUTE: Regex = Regex::new(r"(?i)\bsrc=").unwrap();
    static ref STYLE_BLOCK: Regex = Regex::new(r"(?is)<style>(.*?)</style>").unwrap();
    static ref LANG_KEY: Regex = Regex::new(r"\{lang:[^}]+\}").unwrap();

    pub static ref EXTERNAL_SCRIPT_SRC: Regex =
        Regex::new(r#"(?i)<script[^>]+src=['"](?:https?:)?//"#).unwrap();
    pub static ref EXTERNAL_CSS_IMPORT: Regex =
        Regex::new(r#"(?i)@import\s+url\(["']?https?://"#).unwrap();
    pub static ref EXTERNAL_FONT_CDN: Regex = Regex::new(
        r#"(?i)<link[^>]+href=['"]https?://[^"']*(fonts\.googleapis|fonts\.gstatic|use\.typekit|bootstrapcdn|cdn\.jsdelivr|cdnjs|unpkg)"#
    )
    .unwrap();
}

/// Every meta option name in document order, duplicates included
pub fn meta_names(html: &str) -> Vec<&str> {
    META_NAME
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// The document's opening `<html ...>` tag
pub fn html_open_tag(html: &str) -> Option<&str> {
    HTML_OPEN_TAG.find(html).map(|m| m.as_str())
}

/// Total characters of all inline (non-`src`) script bodies
pub fn inline_script_chars(html: &str) -> usize {
    INLINE_SCRIPT
        .captures_iter(html)
        .filter(|caps| !caps.get(1).is_some_and(|attrs| SRC_ATTRIBUTE.is_match(attrs.as_str())))
        .filter_map(|caps| caps.get(2))
        .map(|body| body.as_str().chars().count())
        .sum()
}

/// True when the marker sits in the first style block and nowhere else
pub fn custom_css_inside_style(html: &str) -> bool {
    let Some(style) = STYLE_BLOCK.captures(html) else {
        return false;
    };
    let (Some(whole), Some(content)) = (style.get(0), style.get(1)) else {
        return false;
    };

    if !content.as_str().contains(CUSTOM_CSS_MARKER) {
        return false;
    }

    !html[..whole.start()].contains(CUSTOM_CSS_MARKER)
        && !html[whole.end()..].contains(CUSTOM_CSS_MARKER)
}

/// Distinct `{lang:...}` keys in the document
pub fn lang_keys(html: &str) -> BTreeSet<&str> {
    LANG_KEY.find_iter(html).map(|m| m.as_str()).collect()
}
