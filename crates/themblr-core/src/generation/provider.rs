//! The override collaborator seam
//!
//! The orchestrator never talks to a model directly. It asks an
//! [`OverrideProvider`] for zone overrides and treats whatever comes back as
//! untrusted input.

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use themblr_types::{EditableZones, PartialEditableZones, StructuredInput};
use tracing::debug;

use crate::error::ProviderError;

/// Everything a collaborator needs for one override request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequest {
    pub theme_name: String,
    pub slug: String,
    pub structured: StructuredInput,
    pub prompt: String,
    pub base_editable_zones: EditableZones,
    /// Problems the previous attempt must fix; empty on the first call
    #[serde(default)]
    pub violations: Vec<String>,
    /// Retries ask for a CSS-only answer
    #[serde(default)]
    pub reduced_scope: bool,
    pub timeout_ms: u64,
}

/// Collaborator answer; every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverridePayload {
    pub editable_zones: PartialEditableZones,
    pub meta_defaults: BTreeMap<String, String>,
    pub notes: Vec<String>,
}

impl OverridePayload {
    /// Parse raw collaborator output
    pub fn from_json(raw: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(raw.trim()).map_err(|e| {
            if e.is_syntax() || e.is_eof() {
                ProviderError::NonJson
            } else {
                ProviderError::Schema(e.to_string())
            }
        })
    }

    /// Payload carrying only a CSS core override
    pub fn css_only(css_core: impl Into<String>) -> Self {
        let mut editable_zones = PartialEditableZones::default();
        editable_zones.css_core = Some(css_core.into());
        Self {
            editable_zones,
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait OverrideProvider: Send + Sync {
    async fn generate(&self, request: OverrideRequest) -> Result<OverridePayload, ProviderError>;
}

/// Serves pre-recorded payloads in order and keeps every request it saw
#[derive(Debug, Default)]
pub struct ReplayProvider {
    payloads: Mutex<VecDeque<OverridePayload>>,
    requests: Mutex<Vec<OverrideRequest>>,
}

impl ReplayProvider {
    pub fn new(payloads: impl IntoIterator<Item = OverridePayload>) -> Self {
        Self {
            payloads: Mutex::new(payloads.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<OverrideRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|requests| requests.len()).unwrap_or(0)
    }
}

#[async_trait]
impl OverrideProvider for ReplayProvider {
    async fn generate(&self, request: OverrideRequest) -> Result<OverridePayload, ProviderError> {
        let call = {
            let mut requests = self
                .requests
                .lock()
                .map_err(|_| ProviderError::Internal("replay log poisoned".into()))?;
            requests.push(request);
            requests.len()
        };

        let payload = self
            .payloads
            .lock()
            .map_err(|_| ProviderError::Internal("replay queue poisoned".into()))?
            .pop_front()
            .ok_or(ProviderError::Exhausted(call))?;

        debug!(call, "Replaying recorded override payload");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use themblr_types::EditableZoneKey;

    #[test]
    fn test_payload_defaults_missing_fields() {
        let payload = OverridePayload::from_json(r#"{"editableZones":{"cssCore":"body{}"}}"#).unwrap();

        assert_eq!(payload.editable_zones.get(EditableZoneKey::CssCore), Some("body{}"));
        assert!(payload.meta_defaults.is_empty());
        assert!(payload.notes.is_empty());
    }

    #[test]
    fn test_non_json_and_schema_errors_differ() {
        assert!(matches!(
            OverridePayload::from_json("Sure! Here is your theme."),
            Err(ProviderError::NonJson)
        ));
        assert!(matches!(
            OverridePayload::from_json(r#"{"editableZones":{"cssCore":"a""#),
            Err(ProviderError::NonJson)
        ));
        assert!(matches!(
            OverridePayload::from_json(r#"{"metaDefaults":{"text:Subtitle":7}}"#),
            Err(ProviderError::Schema(_))
        ));
        assert!(matches!(
            OverridePayload::from_json(r#""just a string""#),
            Err(ProviderError::Schema(_))
        ));
    }

    fn override_request(reduced_scope: bool) -> OverrideRequest {
        serde_json::from_value(serde_json::json!({
            "themeName": "Night Owl",
            "slug": "night-owl",
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
                    "showRelatedPosts": true,
                    "showFooter": true,
                    "enableMotion": false
                },
                "tone": "Quiet",
                "paletteHint": "Ink"
            },
            "prompt": "Minimal",
            "baseEditableZones": {
                "cssCore": "",
                "headerSection": "",
                "sidebarSection": "",
                "contextSection": ""
            },
            "reducedScope": reduced_scope,
            "timeoutMs": 1000
        }))
        .unwrap()
    }

    #[test]
    fn test_replay_serves_in_order_then_exhausts() {
        let provider = ReplayProvider::new(vec![
            OverridePayload::css_only("a {}"),
            OverridePayload::css_only("b {}"),
        ]);

        let first = tokio_test::block_on(provider.generate(override_request(false))).unwrap();
        let second = tokio_test::block_on(provider.generate(override_request(true))).unwrap();
        let third = tokio_test::block_on(provider.generate(override_request(true)));

        assert_eq!(first.editable_zones.css_core.as_deref(), Some("a {}"));
        assert_eq!(second.editable_zones.css_core.as_deref(), Some("b {}"));
        assert!(matches!(third, Err(ProviderError::Exhausted(3))));

        let requests = provider.requests();
        assert_eq!(provider.call_count(), 3);
        assert!(!requests[0].reduced_scope);
        assert!(requests[1].reduced_scope);
        assert!(requests[0].violations.is_empty());
    }

    #[test]
    fn test_css_only_payload() {
        let payload = OverridePayload::css_only(".post-card {}");
        assert_eq!(
            payload.editable_zones.get(EditableZoneKey::CssCore),
            Some(".post-card {}")
        );
        assert_eq!(payload.editable_zones.header_section, None);
    }
}
