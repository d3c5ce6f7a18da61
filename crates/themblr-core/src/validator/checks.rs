//! Individual contract checks
//!
//! Each check inspects the whole document and reports a pass message or a
//! failure message with the offending items. Error checks decide the verdict;
//! warning checks are advisory.

use themblr_types::Severity;

use super::patterns::{
    custom_css_inside_style, html_open_tag, inline_script_chars, lang_keys, meta_names,
    EXTERNAL_CSS_IMPORT, EXTERNAL_FONT_CDN, EXTERNAL_SCRIPT_SRC,
};
use super::ValidationContext;
use crate::blocks::{check_block_balance, open_block_names};
use crate::contracts::{
    RECOMMENDED_LANG_KEYS, REQUIRED_JS_SIGNATURES, REQUIRED_META_OPTION_NAMES,
    REQUIRED_ROOT_DATA_ATTRS, REQUIRED_TUMBLR_BLOCKS,
};
use crate::zones::{missing_css_variables, missing_stable_hooks};

/// Lang keys listed in the localization warning message
const MAX_LISTED_LANG_KEYS: usize = 12;

/// Outcome of one check before it is tagged with its id and severity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub message: String,
    pub details: Option<Vec<String>>,
}

impl CheckOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            details: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: Vec<String>) -> Self {
        if !details.is_empty() {
            self.details = Some(details);
        }
        self
    }
}

/// A single structural rule over a theme document
pub trait ThemeCheck: Send + Sync {
    /// Stable identifier reported in the check list
    fn id(&self) -> &'static str;

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, html: &str, context: &ValidationContext) -> CheckOutcome;
}

/// Pass when nothing is missing, otherwise list the missing items
fn missing_items(missing: Vec<&str>, pass: &str, fail_prefix: &str) -> CheckOutcome {
    if missing.is_empty() {
        return CheckOutcome::pass(pass);
    }
    CheckOutcome::fail(format!("{}: {}", fail_prefix, missing.join(", ")))
        .with_details(missing.into_iter().map(str::to_string).collect())
}

fn forbidden(found: bool, pass: &str, fail: &str) -> CheckOutcome {
    if found {
        CheckOutcome::fail(fail)
    } else {
        CheckOutcome::pass(pass)
    }
}

pub struct RequiredMetaOptions;

impl ThemeCheck for RequiredMetaOptions {
    fn id(&self) -> &'static str {
        "required-meta-options"
    }

    fn check(&self, html: &str, _context: &ValidationContext) -> CheckOutcome {
        let present = meta_names(html);
        let missing = REQUIRED_META_OPTION_NAMES
            .iter()
            .copied()
            .filter(|name| !present.contains(name))
            .collect();
        missing_items(
            missing,
            "All required meta option names are present",
            "Missing required meta options",
        )
    }
}

/// Data attributes on the opening `<html>` tag
pub struct RequiredRootAttributes;

impl ThemeCheck for RequiredRootAttributes {
    fn id(&self) -> &'static str {
        "required-root-attrs"
    }

    fn check(&self, html: &str, _context: &ValidationContext) -> CheckOutcome {
        let root = html_open_tag(html).unwrap_or_default().to_ascii_lowercase();
        let missing = REQUIRED_ROOT_DATA_ATTRS
            .iter()
            .copied()
            .filter(|attr| !root.contains(&format!("{attr}=")))
            .collect();
        missing_items(
            missing,
            "Required root data attributes are present",
            "Missing root attributes",
        )
    }
}

pub struct RequiredStableHooks;

impl ThemeCheck for RequiredStableHooks {
    fn id(&self) -> &'static str {
        "required-stable-hooks"
    }

    fn check(&self, html: &str, _context: &ValidationContext) -> CheckOutcome {
        missing_items(
            missing_stable_hooks(html),
            "Required stable hooks are present",
            "Missing stable hooks",
        )
    }
}

pub struct RequiredCssVariables;

impl ThemeCheck for RequiredCssVariables {
    fn id(&self) -> &'static str {
        "required-css-vars"
    }

    fn check(&self, html: &str, _context: &ValidationContext) -> CheckOutcome {
        missing_items(
            missing_css_variables(html),
            "Required CSS variables are present",
            "Missing CSS variables",
        )
    }
}

pub struct RequiredJsSignatures;

impl ThemeCheck for RequiredJsSignatures {
    fn id(&self) -> &'static str {
        "required-js-signatures"
    }

    fn check(&self, html: &str, _context: &ValidationContext) -> CheckOutcome {
        let missing = REQUIRED_JS_SIGNATURES
            .iter()
            .copied()
            .filter(|signature| !html.contains(signature))
            .collect();
        missing_items(
            missing,
            "Required JS signatures are present",
            "Missing JS signatures",
        )
    }
}

/// An exact open token per required block; `Photoset` does not satisfy `Photo`
pub struct RequiredTumblrBlocks;

impl ThemeCheck for RequiredTumblrBlocks {
    fn id(&self) -> &'static str {
        "required-tumblr-blocks"
    }

    fn check(&self, html: &str, _context: &ValidationContext) -> CheckOutcome {
        let present = open_block_names(html);
        let missing = REQUIRED_TUMBLR_BLOCKS
            .iter()
            .copied()
            .filter(|name| !present.contains(name))
            .collect();
        missing_items(
            missing,
            "Required Tumblr blocks are present",
            "Missing Tumblr blocks",
        )
    }
}

pub struct BlockBalance;

impl ThemeCheck for BlockBalance {
    fn id(&self) -> &'static str {
        "block-balance"
    }

    fn check(&self, html: &str, _context: &ValidationContext) -> CheckOutcome {
        let errors = check_block_balance(html);
        if errors.is_empty() {
            return CheckOutcome::pass("Tumblr block tags are balanced");
        }
        CheckOutcome::fail(format!("Block balance errors: {}", errors.join("; ")))
            .with_details(errors)
    }
}

pub struct NoExternalScripts;

impl ThemeCheck for NoExternalScripts {
    fn id(&self) -> &'static str {
        "disallow-external-script-src"
    }

    fn check(&self, html: &str, _context: &ValidationContext) -> CheckOutcome {
        forbidden(
            EXTERNAL_SCRIPT_SRC.is_match(html),
            "No external script src dependencies detected",
            "External script src dependencies are not allowed",
        )
    }
}

pub struct NoExternalCssImports;

impl ThemeCheck for NoExternalCssImports {
    fn id(&self) -> &'static str {
        "disallow-external-css-import"
    }

    fn check(&self, html: &str, _context: &ValidationContext) -> CheckOutcome {
        forbidden(
            EXTERNAL_CSS_IMPORT.is_match(html),
            "No external CSS @import dependencies detected",
            "External CSS @import dependencies are not allowed",
        )
    }
}

pub struct NoExternalFontCdn;

impl ThemeCheck for NoExternalFontCdn {
    fn id(&self) -> &'static str {
        "disallow-external-font-cdn"
    }

    fn check(&self, html: &str, _context: &ValidationContext) -> CheckOutcome {
        forbidden(
            EXTERNAL_FONT_CDN.is_match(html),
            "No external font CDN links detected",
            "External font CDN links are not allowed",
        )
    }
}

pub struct CustomCssPlacement;

impl ThemeCheck for CustomCssPlacement {
    fn id(&self) -> &'static str {
        "customcss-inside-style"
    }

    fn check(&self, html: &str, _context: &ValidationContext) -> CheckOutcome {
        if custom_css_inside_style(html) {
            CheckOutcome::pass("{CustomCSS} marker exists inside style block")
        } else {
            CheckOutcome::fail("{CustomCSS} marker is missing or outside style block")
        }
    }
}

pub struct ThemeSizeWarning;

impl ThemeCheck for ThemeSizeWarning {
    fn id(&self) -> &'static str {
        "warn-theme-size"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, html: &str, context: &ValidationContext) -> CheckOutcome {
        let bytes = html.len();
        if bytes <= context.max_theme_bytes {
            return CheckOutcome::pass("Theme size is within warning threshold");
        }
        CheckOutcome::fail(format!(
            "Theme size warning: {} bytes exceeds {}",
            bytes, context.max_theme_bytes
        ))
    }
}

pub struct InlineScriptSizeWarning;

impl ThemeCheck for InlineScriptSizeWarning {
    fn id(&self) -> &'static str {
        "warn-inline-script-size"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, html: &str, context: &ValidationContext) -> CheckOutcome {
        let chars = inline_script_chars(html);
        if chars <= context.max_inline_script_chars {
            return CheckOutcome::pass("Inline script size is within warning threshold");
        }
        CheckOutcome::fail(format!(
            "Inline script warning: {} chars exceeds {}",
            chars, context.max_inline_script_chars
        ))
    }
}

/// Lang keys of the base template, or the recommended set when it has none
pub struct LocalizationKeysWarning;

impl ThemeCheck for LocalizationKeysWarning {
    fn id(&self) -> &'static str {
        "warn-missing-localization-keys"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, html: &str, context: &ValidationContext) -> CheckOutcome {
        let present = lang_keys(html);
        let expected: Vec<&str> = if context.base_lang_keys.is_empty() {
            RECOMMENDED_LANG_KEYS.to_vec()
        } else {
            context.base_lang_keys.iter().map(String::as_str).collect()
        };
        let missing: Vec<&str> = expected
            .into_iter()
            .filter(|key| !present.contains(key))
            .collect();

        if missing.is_empty() {
            return CheckOutcome::pass("Localized language keys are preserved");
        }

        let listed = missing
            .iter()
            .take(MAX_LISTED_LANG_KEYS)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        let ellipsis = if missing.len() > MAX_LISTED_LANG_KEYS {
            " ..."
        } else {
            ""
        };

        CheckOutcome::fail(format!(
            "Missing localized language keys: {listed}{ellipsis}"
        ))
        .with_details(missing.into_iter().map(str::to_string).collect())
    }
}

/// Every check, in report order
pub fn default_checks() -> Vec<Box<dyn ThemeCheck>> {
    vec![
        Box::new(RequiredMetaOptions),
        Box::new(RequiredRootAttributes),
        Box::new(RequiredStableHooks),
        Box::new(RequiredCssVariables),
        Box::new(RequiredJsSignatures),
        Box::new(RequiredTumblrBlocks),
        Box::new(BlockBalance),
        Box::new(NoExternalScripts),
        Box::new(NoExternalCssImports),
        Box::new(NoExternalFontCdn),
        Box::new(CustomCssPlacement),
        Box::new(ThemeSizeWarning),
        Box::new(InlineScriptSizeWarning),
        Box::new(LocalizationKeysWarning),
    ]
}
