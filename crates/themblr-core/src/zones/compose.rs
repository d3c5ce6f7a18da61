//! Apply zone overrides and meta defaults to the base template

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::{Captures, NoExpand, Regex};
use themblr_types::{ChangedZoneSummary, EditableZoneKey, EditableZones, PartialEditableZones};
use tracing::debug;

use super::extract::{extract_zones, find_sidebar, CONTEXT, HEADER, STYLE_BLOCK};
use super::policy::{
    build_css_contract_backfill, detect_missing_css_contracts, CssMergePolicy,
    ThresholdMergePolicy,
};
use crate::contracts::{CUSTOM_CSS_MARKER, REQUIRED_META_OPTION_NAMES, SELECT_META_PREFIX};
use crate::error::TemplateError;

/// Longest value written into a meta option
const MAX_META_VALUE_CHARS: usize = 240;

lazy_static! {
    static ref LINE_BREAKS: Regex = Regex::new(r"[\r\n]+").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeResult {
    pub theme_html: String,
    pub changed_regions: Vec<ChangedZoneSummary>,
}

/// Applies overrides to a base template under a CSS merge policy
pub struct Composer {
    policy: Box<dyn CssMergePolicy>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::with_policy(ThresholdMergePolicy::default())
    }
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer").finish_non_exhaustive()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: impl CssMergePolicy + 'static) -> Self {
        Self {
            policy: Box::new(policy),
        }
    }

    /// Compose `base_template` with the given overrides.
    ///
    /// Fails only when the base template itself cannot be decomposed. Blank
    /// overrides leave their zone untouched, and every byte outside the
    /// overridden zones and meta contents is preserved.
    pub fn compose(
        &self,
        base_template: &str,
        overrides: &PartialEditableZones,
        meta_defaults: &BTreeMap<String, String>,
    ) -> Result<ComposeResult, TemplateError> {
        let base = extract_zones(base_template)?.editable_zones;
        let mut html = base_template.to_string();

        if let Some(css) = overrides.get(EditableZoneKey::CssCore) {
            html = self.apply_css_core(&html, css);
        }
        if let Some(header) = overrides.get(EditableZoneKey::HeaderSection) {
            html = HEADER.replacen(&html, 1, NoExpand(header.trim())).into_owned();
        }
        if let Some(sidebar) = overrides.get(EditableZoneKey::SidebarSection) {
            html = apply_sidebar(&html, sidebar.trim());
        }
        if let Some(context) = overrides.get(EditableZoneKey::ContextSection) {
            let context = context.trim();
            html = CONTEXT
                .replacen(&html, 1, |caps: &Captures| {
                    format!("{}\n{}\n\n            {}", &caps[1], context, &caps[3])
                })
                .into_owned();
        }

        html = apply_meta_defaults(&html, meta_defaults);

        let changed_regions = summarize_changes(&base, &html, overrides);
        debug!(
            changed = changed_regions.iter().filter(|zone| zone.changed).count(),
            "Composed theme"
        );

        Ok(ComposeResult {
            theme_html: html,
            changed_regions,
        })
    }

    fn apply_css_core(&self, html: &str, css_override: &str) -> String {
        let css_override = css_override.trim();

        STYLE_BLOCK
            .replacen(html, 1, |caps: &Captures| {
                let content = &caps[1];
                let Some(marker) = content.find(CUSTOM_CSS_MARKER) else {
                    return caps[0].to_string();
                };

                let base_css = content[..marker].trim_end();
                let marker_and_suffix = content[marker..].trim_start();

                let merged = if self.policy.should_merge(base_css, css_override) {
                    format!("{base_css}\n\n        /* Themblr AI override */\n        {css_override}")
                } else {
                    let missing = detect_missing_css_contracts(css_override);
                    if missing.is_empty() {
                        css_override.to_string()
                    } else {
                        format!(
                            "{css_override}\n\n        /* Themblr contract backfill */\n        {}",
                            build_css_contract_backfill(&missing)
                        )
                    }
                };

                format!("<style>\n{merged}\n\n        {marker_and_suffix}\n    </style>")
            })
            .into_owned()
    }
}

/// Compose with the default merge policy
pub fn compose_template(
    base_template: &str,
    overrides: &PartialEditableZones,
    meta_defaults: &BTreeMap<String, String>,
) -> Result<ComposeResult, TemplateError> {
    Composer::default().compose(base_template, overrides, meta_defaults)
}

fn apply_sidebar(html: &str, sidebar: &str) -> String {
    match find_sidebar(html) {
        Some(range) => format!("{}{}{}", &html[..range.start], sidebar, &html[range.end..]),
        None => html.to_string(),
    }
}

fn sanitize_meta_value(value: &str) -> String {
    let flattened = LINE_BREAKS.replace_all(value, " ");
    let unquoted: String = flattened.chars().filter(|c| *c != '"' && *c != '\'').collect();
    unquoted.trim().chars().take(MAX_META_VALUE_CHARS).collect()
}

fn replace_meta_content(html: &str, name: &str, value: &str) -> String {
    let name = regex::escape(name);
    // Each attribute must close with the quote it opened with
    let pattern = format!(
        r#"(?i)(<meta\s+[^>]*name=(?:"{name}"|'{name}')[^>]*content=)(?:"([^"']*)"|'([^"']*)')([^>]*>)"#
    );
    // Escaped name, so construction cannot fail
    let Ok(meta) = Regex::new(&pattern) else {
        return html.to_string();
    };
    let value = sanitize_meta_value(value);

    meta.replacen(html, 1, |caps: &Captures| {
        let quote = if caps.get(2).is_some() { '"' } else { '\'' };
        format!("{}{quote}{value}{quote}{}", &caps[1], &caps[4])
    })
    .into_owned()
}

/// Write default values into required, non-select meta options.
///
/// Unknown names and `select:` options are ignored; only the first matching
/// meta tag per name is changed.
pub fn apply_meta_defaults(html: &str, meta_defaults: &BTreeMap<String, String>) -> String {
    meta_defaults
        .iter()
        .filter(|(name, _)| {
            REQUIRED_META_OPTION_NAMES.contains(&name.as_str())
                && !name.starts_with(SELECT_META_PREFIX)
        })
        .fold(html.to_string(), |html, (name, value)| {
            replace_meta_content(&html, name, value)
        })
}

fn summarize_changes(
    base: &EditableZones,
    composed_html: &str,
    overrides: &PartialEditableZones,
) -> Vec<ChangedZoneSummary> {
    let after = match extract_zones(composed_html) {
        Ok(extraction) => extraction.editable_zones,
        Err(_) => {
            let mut fallback = base.clone();
            for key in EditableZoneKey::ALL {
                if let Some(value) = overrides.get(key) {
                    *fallback.get_mut(key) = value.trim().to_string();
                }
            }
            fallback
        }
    };

    EditableZoneKey::ALL
        .iter()
        .map(|key| {
            let old_value = base.get(*key);
            let new_value = after.get(*key);
            ChangedZoneSummary {
                zone: *key,
                changed: old_value != new_value,
                old_chars: old_value.chars().count(),
                new_chars: new_value.chars().count(),
            }
        })
        .collect()
}
