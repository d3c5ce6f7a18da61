//! Generation request model and its field constraints

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_THEME_NAME_CHARS: usize = 120;
pub const MAX_SLUG_CHARS: usize = 80;
pub const MAX_PROMPT_CHARS: usize = 20_000;
pub const MAX_TONE_CHARS: usize = 120;
pub const MAX_PALETTE_HINT_CHARS: usize = 220;

/// Request field violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("{field} must be between 1 and {max} characters")]
    Length { field: &'static str, max: usize },

    #[error("slug must be kebab-case")]
    SlugFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Stream,
    Split,
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostWidth {
    Compact,
    Regular,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    Outlined,
    Elevated,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderAlignment {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotesAvatarSize {
    Small,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toggles {
    pub show_sidebar: bool,
    pub show_search: bool,
    pub show_featured_tags: bool,
    pub show_following: bool,
    pub show_likes_widget: bool,
    pub show_related_posts: bool,
    pub show_footer: bool,
    pub enable_motion: bool,
}

/// Structured theme choices made outside the free-text prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredInput {
    pub layout: Layout,
    pub post_width: PostWidth,
    pub card_style: CardStyle,
    pub header_alignment: HeaderAlignment,
    pub notes_avatar_size: NotesAvatarSize,
    pub toggles: Toggles,
    pub tone: String,
    pub palette_hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub theme_name: String,
    pub slug: String,
    pub structured: StructuredInput,
    pub prompt: String,
}

impl GenerateRequest {
    /// Check every length and format constraint
    pub fn validate(&self) -> Result<(), RequestError> {
        check_length("themeName", &self.theme_name, MAX_THEME_NAME_CHARS)?;
        check_length("slug", &self.slug, MAX_SLUG_CHARS)?;
        if !is_kebab_case(&self.slug) {
            return Err(RequestError::SlugFormat);
        }
        check_length("prompt", &self.prompt, MAX_PROMPT_CHARS)?;
        check_length("tone", &self.structured.tone, MAX_TONE_CHARS)?;
        check_length(
            "paletteHint",
            &self.structured.palette_hint,
            MAX_PALETTE_HINT_CHARS,
        )?;
        Ok(())
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), RequestError> {
    let chars = value.chars().count();
    if chars == 0 || chars > max {
        return Err(RequestError::Length { field, max });
    }
    Ok(())
}

/// `^[a-z0-9]+(?:-[a-z0-9]+)*$`
fn is_kebab_case(slug: &str) -> bool {
    slug.split('-').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest {
            theme_name: "Test Theme".to_string(),
            slug: "test-theme".to_string(),
            structured: StructuredInput {
                layout: Layout::Stream,
                post_width: PostWidth::Regular,
                card_style: CardStyle::Outlined,
                header_alignment: HeaderAlignment::Left,
                notes_avatar_size: NotesAvatarSize::Small,
                toggles: Toggles {
                    show_sidebar: true,
                    show_search: true,
                    show_featured_tags: true,
                    show_following: false,
                    show_likes_widget: false,
                    show_related_posts: true,
                    show_footer: true,
                    enable_motion: true,
                },
                tone: "Clean".to_string(),
                palette_hint: "Neutral".to_string(),
            },
            prompt: "Make it bold".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert_eq!(request().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_non_kebab_slug() {
        for slug in ["Test", "test--theme", "-test", "test-", "test_theme"] {
            let mut req = request();
            req.slug = slug.to_string();
            assert_eq!(req.validate(), Err(RequestError::SlugFormat), "{}", slug);
        }
    }

    #[test]
    fn test_rejects_empty_prompt() {
        let mut req = request();
        req.prompt.clear();
        assert_eq!(
            req.validate(),
            Err(RequestError::Length {
                field: "prompt",
                max: MAX_PROMPT_CHARS
            })
        );
    }

    #[test]
    fn test_deserializes_wire_shape() {
        let json = serde_json::json!({
            "themeName": "Grid",
            "slug": "grid",
            "structured": {
                "layout": "grid",
                "postWidth": "wide",
                "cardStyle": "minimal",
                "headerAlignment": "center",
                "notesAvatarSize": "large",
                "toggles": {
                    "showSidebar": false,
                    "showSearch": true,
                    "showFeaturedTags": false,
                    "showFollowing": false,
                    "showLikesWidget": false,
                    "showRelatedPosts": false,
                    "showFooter": true,
                    "enableMotion": false
                },
                "tone": "Calm",
                "paletteHint": "Slate"
            },
            "prompt": "Quiet editorial grid"
        });

        let req: GenerateRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.structured.layout, Layout::Grid);
        assert!(!req.structured.toggles.show_sidebar);
        assert!(req.validate().is_ok());
    }
}
