//! The fixed structural contract every theme document must satisfy

pub const SCHEMA_VERSION: &str = "themblr-schema-version-1.0";

/// Marker Tumblr replaces with the blog owner's custom CSS
pub const CUSTOM_CSS_MARKER: &str = "{CustomCSS}";

/// Meta option names the customize panel depends on
pub const REQUIRED_META_OPTION_NAMES: &[&str] = &[
    "color:Page Background",
    "color:Surface",
    "color:Surface Alt",
    "color:Text",
    "color:Muted Text",
    "color:Accent",
    "color:Accent Contrast",
    "color:Border",
    "color:Header Background",
    "color:Header Text",
    "font:Heading",
    "font:Body",
    "font:Mono",
    "if:Show Sidebar",
    "if:Sticky Header",
    "if:Show Search",
    "if:Show Featured Tags",
    "if:Show Following",
    "if:Show Likes Widget",
    "if:Show Related Posts",
    "if:Use Jump Pagination",
    "if:Show Footer",
    "if:Enable Motion",
    "select:Layout",
    "select:Post Width",
    "select:Card Style",
    "select:Header Alignment",
    "select:Notes Avatar Size",
    "text:Subtitle",
    "text:Footer Note",
    "text:CTA Label",
    "text:CTA URL",
    "image:Logo",
    "image:Hero",
    "image:Background Texture",
];

/// Prefix of meta options driven by structured input rather than free text
pub const SELECT_META_PREFIX: &str = "select:";

pub const REQUIRED_ROOT_DATA_ATTRS: &[&str] = &["data-layout", "data-width", "data-card"];

pub const REQUIRED_STABLE_HOOKS: &[&str] = &[
    ".site-shell",
    ".site-header",
    ".site-main",
    ".site-sidebar",
    ".post-card",
    ".post-meta",
    ".reblog-list",
    ".pagination",
    ".theme-module",
];

/// Required custom properties paired with the value used when backfilling
pub const REQUIRED_CSS_VARIABLES: &[(&str, &str)] = &[
    ("--t-bg", "#f7f8fb"),
    ("--t-surface", "#ffffff"),
    ("--t-text", "#131722"),
    ("--t-muted", "#5d6778"),
    ("--t-accent", "#2f6fed"),
    ("--t-border", "#d8dee8"),
    ("--t-radius", "14px"),
    ("--t-gap", "1rem"),
    ("--t-max-post", "760px"),
];

pub const REQUIRED_JS_SIGNATURES: &[&str] = &[
    "ThemeStarter.init = function",
    "ThemeStarter.refreshLikeButtons = function",
    "window.ThemeStarter = ThemeStarter",
    "window.tumblrNotesLoaded = function",
    "window.tumblrNotesInserted = function",
];

pub const REQUIRED_TUMBLR_BLOCKS: &[&str] = &[
    "Text",
    "Answer",
    "Photo",
    "Panorama",
    "Photoset",
    "Quote",
    "Link",
    "Chat",
    "Audio",
    "Video",
    "NotReblog",
    "RebloggedFrom",
    "Reblogs",
    "Pagination",
    "PermalinkPagination",
    "SearchPage",
    "NoSearchResults",
    "RelatedPosts",
];

/// Used for the localization warning when the base template carries no keys
pub const RECOMMENDED_LANG_KEYS: &[&str] = &[
    "{lang:Search}",
    "{lang:Archive}",
    "{lang:Home}",
    "{lang:Pages}",
    "{lang:Permalink}",
];

/// Ids of every error-severity check, in report order
pub const REQUIRED_VALIDATION_CHECK_IDS: &[&str] = &[
    "required-meta-options",
    "required-root-attrs",
    "required-stable-hooks",
    "required-css-vars",
    "required-js-signatures",
    "required-tumblr-blocks",
    "block-balance",
    "disallow-external-script-src",
    "disallow-external-css-import",
    "disallow-external-font-cdn",
    "customcss-inside-style",
];

/// Ids of the advisory checks, in report order
pub const WARNING_CHECK_IDS: &[&str] = &[
    "warn-theme-size",
    "warn-inline-script-size",
    "warn-missing-localization-keys",
];

pub const MAX_THEME_BYTES_WARNING: usize = 300_000;
pub const MAX_INLINE_SCRIPT_WARNING_CHARS: usize = 40_000;

/// Fallback value for a required CSS variable
pub fn css_variable_fallback(name: &str) -> &'static str {
    REQUIRED_CSS_VARIABLES
        .iter()
        .find(|(var, _)| *var == name)
        .map(|(_, fallback)| *fallback)
        .unwrap_or("initial")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_option_names_are_unique() {
        let mut names: Vec<&str> = REQUIRED_META_OPTION_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), REQUIRED_META_OPTION_NAMES.len());
    }

    #[test]
    fn test_css_variable_fallbacks() {
        assert_eq!(css_variable_fallback("--t-radius"), "14px");
        assert_eq!(css_variable_fallback("--t-unknown"), "initial");
        assert_eq!(REQUIRED_CSS_VARIABLES.len(), 9);
    }
}
