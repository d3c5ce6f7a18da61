//! Shared request and payload builders

#![allow(dead_code)]

use themblr_core::contracts::{REQUIRED_CSS_VARIABLES, REQUIRED_STABLE_HOOKS};
use themblr_core::OverridePayload;
use themblr_types::{
    CardStyle, EditableZoneKey, GenerateRequest, HeaderAlignment, Layout, NotesAvatarSize,
    PostWidth, StructuredInput, Toggles,
};

pub fn request() -> GenerateRequest {
    GenerateRequest {
        theme_name: "Night Owl".to_string(),
        slug: "night-owl".to_string(),
        structured: StructuredInput {
            layout: Layout::Split,
            post_width: PostWidth::Wide,
            card_style: CardStyle::Elevated,
            header_alignment: HeaderAlignment::Center,
            notes_avatar_size: NotesAvatarSize::Large,
            toggles: Toggles {
                show_sidebar: true,
                show_search: true,
                show_featured_tags: true,
                show_following: false,
                show_likes_widget: false,
                show_related_posts: true,
                show_footer: true,
                enable_motion: false,
            },
            tone: "Moody editorial".to_string(),
            palette_hint: "Deep navy with coral accent".to_string(),
        },
        prompt: "A dark, high-contrast reading theme with compact cards".to_string(),
    }
}

/// A complete CSS core that shares little with the starter's
pub fn distinct_css() -> String {
    let declarations: Vec<String> = REQUIRED_CSS_VARIABLES
        .iter()
        .enumerate()
        .map(|(i, (name, _))| format!("  {name}: var(--night-{i}, #0b10{i:02});"))
        .collect();

    let rules: Vec<String> = REQUIRED_STABLE_HOOKS
        .iter()
        .map(|hook| {
            format!(
                "{hook} {{\n  border: 1px dashed var(--t-border);\n  background: linear-gradient(180deg, var(--t-surface), #05070f);\n  box-shadow: inset 0 0 0 1px rgba(255, 122, 89, 0.35);\n  letter-spacing: 0.02em;\n}}"
            )
        })
        .collect();

    format!(
        "/* night owl */\n:root {{\n{}\n}}\n\n{}",
        declarations.join("\n"),
        rules.join("\n\n")
    )
}

pub fn css_payload(css: impl Into<String>) -> OverridePayload {
    OverridePayload::css_only(css)
}

pub fn payload_with(zones: &[(EditableZoneKey, &str)]) -> OverridePayload {
    let mut payload = OverridePayload::default();
    for (key, value) in zones {
        payload.editable_zones.set(*key, *value);
    }
    payload
}
