//! Zone keys and zone value maps

use serde::{Deserialize, Serialize};

/// Regions callers or the AI collaborator may rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditableZoneKey {
    CssCore,
    HeaderSection,
    SidebarSection,
    ContextSection,
}

impl EditableZoneKey {
    /// All editable keys in canonical order
    pub const ALL: [EditableZoneKey; 4] = [
        EditableZoneKey::CssCore,
        EditableZoneKey::HeaderSection,
        EditableZoneKey::SidebarSection,
        EditableZoneKey::ContextSection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EditableZoneKey::CssCore => "cssCore",
            EditableZoneKey::HeaderSection => "headerSection",
            EditableZoneKey::SidebarSection => "sidebarSection",
            EditableZoneKey::ContextSection => "contextSection",
        }
    }
}

impl std::fmt::Display for EditableZoneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regions that must stay byte-identical to the base template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LockedZoneKey {
    PostRenderCore,
    JsCore,
    RootContract,
}

impl LockedZoneKey {
    pub const ALL: [LockedZoneKey; 3] = [
        LockedZoneKey::PostRenderCore,
        LockedZoneKey::JsCore,
        LockedZoneKey::RootContract,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LockedZoneKey::PostRenderCore => "postRenderCore",
            LockedZoneKey::JsCore => "jsCore",
            LockedZoneKey::RootContract => "rootContract",
        }
    }
}

impl std::fmt::Display for LockedZoneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value of every editable zone of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableZones {
    pub css_core: String,
    pub header_section: String,
    pub sidebar_section: String,
    pub context_section: String,
}

impl EditableZones {
    pub fn get(&self, key: EditableZoneKey) -> &str {
        match key {
            EditableZoneKey::CssCore => &self.css_core,
            EditableZoneKey::HeaderSection => &self.header_section,
            EditableZoneKey::SidebarSection => &self.sidebar_section,
            EditableZoneKey::ContextSection => &self.context_section,
        }
    }

    pub fn get_mut(&mut self, key: EditableZoneKey) -> &mut String {
        match key {
            EditableZoneKey::CssCore => &mut self.css_core,
            EditableZoneKey::HeaderSection => &mut self.header_section,
            EditableZoneKey::SidebarSection => &mut self.sidebar_section,
            EditableZoneKey::ContextSection => &mut self.context_section,
        }
    }
}

/// Untrusted, possibly incomplete set of zone overrides.
///
/// Missing and blank values both mean "keep the base zone".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialEditableZones {
    pub css_core: Option<String>,
    pub header_section: Option<String>,
    pub sidebar_section: Option<String>,
    pub context_section: Option<String>,
}

impl PartialEditableZones {
    /// Raw value for a zone, blank or not
    pub fn raw(&self, key: EditableZoneKey) -> Option<&str> {
        match key {
            EditableZoneKey::CssCore => self.css_core.as_deref(),
            EditableZoneKey::HeaderSection => self.header_section.as_deref(),
            EditableZoneKey::SidebarSection => self.sidebar_section.as_deref(),
            EditableZoneKey::ContextSection => self.context_section.as_deref(),
        }
    }

    /// Override for a zone, if one is present and not blank
    pub fn get(&self, key: EditableZoneKey) -> Option<&str> {
        self.raw(key).filter(|value| !value.trim().is_empty())
    }

    pub fn set(&mut self, key: EditableZoneKey, value: impl Into<String>) {
        let value = Some(value.into());
        match key {
            EditableZoneKey::CssCore => self.css_core = value,
            EditableZoneKey::HeaderSection => self.header_section = value,
            EditableZoneKey::SidebarSection => self.sidebar_section = value,
            EditableZoneKey::ContextSection => self.context_section = value,
        }
    }

    /// Keep only the CSS core override
    pub fn css_only(&self) -> Self {
        Self {
            css_core: self.css_core.clone(),
            ..Self::default()
        }
    }

    /// True when no zone carries a non-blank override
    pub fn is_empty(&self) -> bool {
        EditableZoneKey::ALL.iter().all(|key| self.get(*key).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_override_is_absent() {
        let mut overrides = PartialEditableZones::default();
        overrides.set(EditableZoneKey::HeaderSection, "   \n");

        assert_eq!(
            overrides.raw(EditableZoneKey::HeaderSection),
            Some("   \n")
        );
        assert_eq!(overrides.get(EditableZoneKey::HeaderSection), None);
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_css_only_drops_markup_zones() {
        let mut overrides = PartialEditableZones::default();
        overrides.set(EditableZoneKey::CssCore, "body {}");
        overrides.set(EditableZoneKey::ContextSection, "<div></div>");

        let css = overrides.css_only();
        assert_eq!(css.get(EditableZoneKey::CssCore), Some("body {}"));
        assert_eq!(css.get(EditableZoneKey::ContextSection), None);
    }

    #[test]
    fn test_partial_zones_tolerate_missing_keys() {
        let zones: PartialEditableZones =
            serde_json::from_str(r#"{"sidebarSection":"<aside></aside>"}"#).unwrap();

        assert!(zones.css_core.is_none());
        assert_eq!(
            zones.get(EditableZoneKey::SidebarSection),
            Some("<aside></aside>")
        );
    }

    #[test]
    fn test_key_names_match_wire_names() {
        for key in EditableZoneKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
        for key in LockedZoneKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }
}
