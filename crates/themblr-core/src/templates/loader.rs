//! Locate, read and fingerprint the starter template

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use themblr_types::{EditableZoneKey, LockedZoneKey};
use tracing::{debug, info};

use super::embedded::{EMBEDDED_TEMPLATE_PATH, STARTER_THEME};
use crate::contracts::{REQUIRED_VALIDATION_CHECK_IDS, SCHEMA_VERSION};
use crate::error::TemplateError;

/// Fallback locations, relative to the working directory
const STARTER_THEME_FALLBACKS: &[&str] = &[
    "../defaultera/theme.html",
    "../tumblr-starter-theme/theme.html",
    "starter/theme.html",
];

lazy_static! {
    static ref LANG_KEY: Regex = Regex::new(r"\{lang:[^}]+\}").unwrap();
}

/// A loaded starter template, shared read-only across generations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBundle {
    pub template_path: String,
    pub template_html: String,
    /// Lowercase hex SHA-256 of `template_html`
    pub template_hash: String,
    /// Sorted, distinct `{lang:...}` keys of the template
    pub base_lang_keys: Vec<String>,
}

impl TemplateBundle {
    pub fn from_html(template_path: impl Into<String>, template_html: impl Into<String>) -> Self {
        let template_html = template_html.into();
        Self {
            template_path: template_path.into(),
            template_hash: sha256_hex(&template_html),
            base_lang_keys: extract_lang_keys(&template_html),
            template_html,
        }
    }

    /// The starter theme compiled into this crate
    pub fn embedded() -> Self {
        Self::from_html(EMBEDDED_TEMPLATE_PATH, STARTER_THEME)
    }
}

/// What callers may learn about the installed template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub schema_version: String,
    pub template_hash: String,
    pub template_path: String,
    pub editable_zones: Vec<EditableZoneKey>,
    pub locked_zones: Vec<LockedZoneKey>,
    pub required_validation_checks: Vec<String>,
}

pub fn template_metadata(bundle: &TemplateBundle) -> TemplateMetadata {
    TemplateMetadata {
        schema_version: SCHEMA_VERSION.to_string(),
        template_hash: bundle.template_hash.clone(),
        template_path: bundle.template_path.clone(),
        editable_zones: EditableZoneKey::ALL.to_vec(),
        locked_zones: LockedZoneKey::ALL.to_vec(),
        required_validation_checks: REQUIRED_VALIDATION_CHECK_IDS
            .iter()
            .map(|id| id.to_string())
            .collect(),
    }
}

fn sha256_hex(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

fn extract_lang_keys(html: &str) -> Vec<String> {
    LANG_KEY
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Candidate paths in lookup order
pub fn starter_theme_candidates(configured: Option<&Path>) -> Vec<PathBuf> {
    let base = std::env::current_dir().unwrap_or_default();
    configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(STARTER_THEME_FALLBACKS.iter().map(|rel| base.join(rel)))
        .collect()
}

/// Empty or unreadable files do not count as a template
fn read_template(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(html) if !html.is_empty() => Some(html),
        Ok(_) => None,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Starter theme candidate not readable");
            None
        }
    }
}

/// First candidate holding a readable, non-empty template
pub fn resolve_starter_theme_path(configured: Option<&Path>) -> Result<PathBuf, TemplateError> {
    starter_theme_candidates(configured)
        .into_iter()
        .find(|candidate| read_template(candidate).is_some())
        .ok_or(TemplateError::StarterNotFound)
}

/// Load a template from an explicit path
pub fn load_template_at(path: &Path) -> Result<TemplateBundle, TemplateError> {
    let html = std::fs::read_to_string(path)?;
    Ok(TemplateBundle::from_html(path.display().to_string(), html))
}

/// Resolve and load the starter template
pub fn load_starter_template(configured: Option<&Path>) -> Result<TemplateBundle, TemplateError> {
    let path = resolve_starter_theme_path(configured)?;
    let bundle = load_template_at(&path)?;
    info!(
        path = %bundle.template_path,
        hash = %bundle.template_hash,
        "Loaded starter template"
    );
    Ok(bundle)
}
