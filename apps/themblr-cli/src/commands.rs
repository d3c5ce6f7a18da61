//! Subcommand implementations

use std::path::Path;

use anyhow::{Context, Result};
use themblr_core::{
    compose_template, generate_theme, load_starter_template, template_metadata,
    templates::load_template_at, validate_theme_html, OverridePayload, ReplayProvider,
    TemplateBundle, TemplateError, TemplateMetadata, ThemblrConfig,
};
use themblr_types::{GenerateRequest, GenerateResponse, ValidationResult};

/// The configured starter template, or the embedded one when none is installed
pub fn load_bundle(config: &ThemblrConfig) -> Result<TemplateBundle> {
    if let Some(path) = config.starter_theme_path.as_deref() {
        return load_template_at(path)
            .with_context(|| format!("Failed to load template {}", path.display()));
    }

    match load_starter_template(None) {
        Ok(bundle) => Ok(bundle),
        Err(TemplateError::StarterNotFound) => {
            tracing::warn!("No starter theme found on disk, using the embedded template");
            Ok(TemplateBundle::embedded())
        }
        Err(e) => Err(e.into()),
    }
}

fn read_payload(path: &Path) -> Result<OverridePayload> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    OverridePayload::from_json(&raw).with_context(|| format!("Invalid payload {}", path.display()))
}

pub fn validate(config: &ThemblrConfig, file: &Path) -> Result<ValidationResult> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let bundle = load_bundle(config)?;
    Ok(validate_theme_html(
        &html,
        &config.validation_context(bundle.base_lang_keys),
    ))
}

pub fn metadata(config: &ThemblrConfig) -> Result<TemplateMetadata> {
    Ok(template_metadata(&load_bundle(config)?))
}

pub fn compose(config: &ThemblrConfig, overrides: &Path) -> Result<String> {
    let bundle = load_bundle(config)?;
    let payload = read_payload(overrides)?;
    let result = compose_template(
        &bundle.template_html,
        &payload.editable_zones,
        &payload.meta_defaults,
    )?;

    for zone in result.changed_regions.iter().filter(|zone| zone.changed) {
        tracing::info!(
            zone = %zone.zone,
            old_chars = zone.old_chars,
            new_chars = zone.new_chars,
            "Zone changed"
        );
    }
    Ok(result.theme_html)
}

pub async fn generate(
    config: &ThemblrConfig,
    request: &Path,
    payload: &Path,
    retry_payload: Option<&Path>,
) -> Result<GenerateResponse> {
    let raw = std::fs::read_to_string(request)
        .with_context(|| format!("Failed to read {}", request.display()))?;
    let request: GenerateRequest =
        serde_json::from_str(&raw).context("Invalid generate request")?;

    let mut payloads = vec![read_payload(payload)?];
    if let Some(path) = retry_payload {
        payloads.push(read_payload(path)?);
    }

    let bundle = load_bundle(config)?;
    let provider = ReplayProvider::new(payloads);
    let response = generate_theme(&request, &bundle, &provider, config).await?;
    Ok(response)
}
