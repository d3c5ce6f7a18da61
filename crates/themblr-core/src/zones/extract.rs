//! Anchored extraction of editable and locked zones

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use themblr_types::{EditableZoneKey, EditableZones, LockedZoneKey};

use crate::blocks::{find_balanced_block, BlockRange};
use crate::contracts::CUSTOM_CSS_MARKER;
use crate::error::TemplateError;

lazy_static! {
    pub(crate) static ref STYLE_BLOCK: Regex = Regex::new(r"(?s)<style>(.*?)</style>").unwrap();
    pub(crate) static ref HEADER: Regex =
        Regex::new(r#"(?s)<header class="site-header.*?</header>"#).unwrap();
    pub(crate) static ref CONTEXT: Regex = Regex::new(
        r#"(?s)(<main id="main-content" class="site-main" role="main">)(.*?)(<div class="post-feed">)"#
    )
    .unwrap();

    static ref POST_RENDER_CORE: Regex =
        Regex::new(r#"(?s)<div class="post-feed">.*?</main>"#).unwrap();
    static ref INLINE_SCRIPT: Regex = Regex::new(r"(?s)<script>.*?</script>").unwrap();
    static ref ROOT_CONTRACT: Regex = Regex::new(r"(?s)<html.*?>").unwrap();
}

/// Statement that marks the theme runtime script
const JS_CORE_REGISTRATION: &str = "window.ThemeStarter = ThemeStarter;";

/// Block wrapping the sidebar element
pub(crate) const SIDEBAR_BLOCK: &str = "IfShowSidebar";
const SIDEBAR_OPEN: &str = r#"<aside class="site-sidebar"#;
const SIDEBAR_CLOSE: &str = "</aside>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableZoneSnapshot {
    pub key: EditableZoneKey,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedZoneSnapshot {
    pub key: LockedZoneKey,
    pub value: String,
}

/// All zones of one document, computed in a single pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneExtraction {
    pub editable_zones: EditableZones,
    pub editable_zone_snapshots: Vec<EditableZoneSnapshot>,
    pub locked_zone_snapshots: Vec<LockedZoneSnapshot>,
}

/// Locate the `IfShowSidebar` block that wraps exactly the sidebar `<aside>`
pub(crate) fn find_sidebar(html: &str) -> Option<BlockRange> {
    let mut cursor = 0;
    while let Some(range) = find_balanced_block(html, SIDEBAR_BLOCK, cursor) {
        let inner = range.inner(html).trim();
        if inner.starts_with(SIDEBAR_OPEN) && inner.ends_with(SIDEBAR_CLOSE) {
            return Some(range);
        }
        cursor = range.inner_start;
    }
    None
}

/// Everything in the style block before the custom CSS marker
fn css_core_of(style_content: &str) -> Option<&str> {
    let marker = style_content.find(CUSTOM_CSS_MARKER)?;
    Some(style_content[..marker].trim_end())
}

/// The first plain `<script>` element carrying the runtime registration.
///
/// Other inline scripts, such as one inside a header override, are skipped.
fn js_core(html: &str) -> Option<&str> {
    INLINE_SCRIPT
        .find_iter(html)
        .map(|m| m.as_str())
        .find(|script| script.contains(JS_CORE_REGISTRATION))
}

fn locked_zone(html: &str, key: LockedZoneKey) -> Option<&str> {
    match key {
        LockedZoneKey::PostRenderCore => POST_RENDER_CORE.find(html).map(|m| m.as_str()),
        LockedZoneKey::JsCore => js_core(html),
        LockedZoneKey::RootContract => ROOT_CONTRACT.find(html).map(|m| m.as_str()),
    }
}

/// Capture every locked zone, failing on the first missing anchor
pub fn extract_locked_zones(html: &str) -> Result<Vec<LockedZoneSnapshot>, TemplateError> {
    LockedZoneKey::ALL
        .iter()
        .map(|key| {
            locked_zone(html, *key)
                .map(|value| LockedZoneSnapshot {
                    key: *key,
                    value: value.to_string(),
                })
                .ok_or(TemplateError::MissingAnchor(key.as_str()))
        })
        .collect()
}

/// Capture locked zones of an untrusted candidate; absent anchors yield `None`
pub fn extract_locked_zones_lenient(html: &str) -> Vec<(LockedZoneKey, Option<String>)> {
    LockedZoneKey::ALL
        .iter()
        .map(|key| (*key, locked_zone(html, *key).map(str::to_string)))
        .collect()
}

/// Extract all editable and locked zones.
///
/// Either every anchor is found or the whole extraction fails with the name
/// of the first missing anchor.
pub fn extract_zones(html: &str) -> Result<ZoneExtraction, TemplateError> {
    let style = STYLE_BLOCK
        .captures(html)
        .and_then(|caps| caps.get(1))
        .ok_or(TemplateError::MissingAnchor("style block"))?;
    let header = HEADER
        .find(html)
        .ok_or(TemplateError::MissingAnchor("header section"))?;
    let sidebar = find_sidebar(html).ok_or(TemplateError::MissingAnchor("sidebar section"))?;
    let context = CONTEXT
        .captures(html)
        .and_then(|caps| caps.get(2))
        .ok_or(TemplateError::MissingAnchor("context section"))?;

    let css_core = css_core_of(style.as_str()).ok_or(TemplateError::MissingCustomCssMarker)?;

    let editable_zones = EditableZones {
        css_core: css_core.to_string(),
        header_section: header.as_str().to_string(),
        sidebar_section: sidebar.outer(html).to_string(),
        context_section: context.as_str().trim().to_string(),
    };

    let editable_zone_snapshots = EditableZoneKey::ALL
        .iter()
        .map(|key| EditableZoneSnapshot {
            key: *key,
            value: editable_zones.get(*key).to_string(),
        })
        .collect();

    Ok(ZoneExtraction {
        editable_zones,
        editable_zone_snapshots,
        locked_zone_snapshots: extract_locked_zones(html)?,
    })
}

/// CSS core of a candidate document, if it can still be extracted
pub fn extract_css_core_lenient(html: &str) -> Option<String> {
    extract_zones(html)
        .ok()
        .map(|extraction| extraction.editable_zones.css_core)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::STARTER_THEME;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracts_starter_zones() {
        let zones = extract_zones(STARTER_THEME).unwrap();

        assert!(zones.editable_zones.css_core.len() > 1000);
        assert!(zones
            .editable_zones
            .header_section
            .starts_with(r#"<header class="site-header"#));
        assert!(zones
            .editable_zones
            .sidebar_section
            .contains(r#"<aside class="site-sidebar""#));
        assert!(zones
            .editable_zones
            .sidebar_section
            .starts_with("{block:IfShowSidebar}"));
        assert!(zones
            .editable_zones
            .context_section
            .starts_with("{block:SearchPage}"));
        assert!(!zones.editable_zones.css_core.contains(CUSTOM_CSS_MARKER));
        assert_eq!(zones.editable_zone_snapshots.len(), 4);
        assert_eq!(zones.locked_zone_snapshots.len(), 3);
    }

    fn locked(zones: &ZoneExtraction, key: LockedZoneKey) -> &str {
        zones
            .locked_zone_snapshots
            .iter()
            .find(|snapshot| snapshot.key == key)
            .map(|snapshot| snapshot.value.as_str())
            .unwrap()
    }

    #[test]
    fn test_locked_zone_boundaries() {
        let zones = extract_zones(STARTER_THEME).unwrap();

        let post = locked(&zones, LockedZoneKey::PostRenderCore);
        assert!(post.starts_with(r#"<div class="post-feed">"#));
        assert!(post.ends_with("</main>"));

        let js = locked(&zones, LockedZoneKey::JsCore);
        assert!(js.starts_with("<script>"));
        assert!(js.contains("window.ThemeStarter = ThemeStarter;"));
        assert!(js.ends_with("</script>"));

        let root = locked(&zones, LockedZoneKey::RootContract);
        assert!(root.starts_with("<html"));
        assert!(root.contains(r#"data-layout="{select:Layout}""#));
    }

    #[test]
    fn test_js_core_skips_unrelated_inline_scripts() {
        let html = STARTER_THEME.replacen(
            "</header>",
            "<script>var a = 1;</script></header>",
            1,
        );
        let zones = extract_zones(&html).unwrap();
        let base = extract_zones(STARTER_THEME).unwrap();

        assert_eq!(
            locked(&zones, LockedZoneKey::JsCore),
            locked(&base, LockedZoneKey::JsCore)
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = extract_zones(STARTER_THEME).unwrap();
        let second = extract_zones(STARTER_THEME).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_anchor_fails_whole_extraction() {
        let broken = STARTER_THEME.replacen(r#"<header class="site-header""#, "<header", 1);
        let err = extract_zones(&broken).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to extract header section from starter template"
        );

        let broken = STARTER_THEME.replacen("window.ThemeStarter = ThemeStarter;", "", 1);
        let err = extract_zones(&broken).unwrap_err();
        assert!(matches!(err, TemplateError::MissingAnchor("jsCore")));
    }

    #[test]
    fn test_missing_marker_is_reported() {
        let broken = STARTER_THEME.replacen(CUSTOM_CSS_MARKER, "", 1);
        assert!(matches!(
            extract_zones(&broken),
            Err(TemplateError::MissingCustomCssMarker)
        ));
    }

    #[test]
    fn test_sidebar_requires_wrapping_block() {
        let broken = STARTER_THEME.replacen("{block:IfShowSidebar}", "", 1);
        assert!(matches!(
            extract_zones(&broken),
            Err(TemplateError::MissingAnchor("sidebar section"))
        ));
    }

    #[test]
    fn test_lenient_locked_extraction() {
        let broken = STARTER_THEME.replacen(r#"<div class="post-feed">"#, "<div>", 1);
        let zones = extract_locked_zones_lenient(&broken);

        assert_eq!(zones.len(), 3);
        assert_eq!(zones[0], (LockedZoneKey::PostRenderCore, None));
        assert!(zones[1].1.is_some());
        assert!(zones[2].1.is_some());
        assert!(extract_locked_zones(&broken).is_err());
    }
}
