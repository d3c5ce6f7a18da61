//! Generation orchestrator
//!
//! Drives one request from collaborator output to a final document:
//! compose, repair locked zones, validate, then at most one follow-up round.
//! A follow-up is either a distinctness retry (first pass valid but too close
//! to the base CSS) or a compliance fallback (first pass invalid). Only
//! collaborator and template failures are errors; an invalid final document
//! is returned with its validation report.

pub mod distinctness;
pub mod provider;

pub use distinctness::css_change_ratio;
pub use provider::{OverridePayload, OverrideProvider, OverrideRequest, ReplayProvider};

use std::collections::BTreeMap;

use themblr_types::{
    EditableZoneKey, EditableZones, GenerateRequest, GenerateResponse, GenerationReport,
    PartialEditableZones, ValidationResult,
};
use tracing::{debug, info, warn};

use crate::config::ThemblrConfig;
use crate::error::{GenerationError, TemplateError};
use crate::naming::build_theme_file_name;
use crate::templates::TemplateBundle;
use crate::validator::{ThemeValidator, ValidationContext};
use crate::zones::{
    extract_css_core_lenient, extract_zones, repair_locked_zones, ComposeResult, Composer,
};

/// Zones whose overrides are dropped by the CSS-only fallback
const MARKUP_ZONES: [EditableZoneKey; 3] = [
    EditableZoneKey::HeaderSection,
    EditableZoneKey::SidebarSection,
    EditableZoneKey::ContextSection,
];

const DIFFERENTIATION_INSTRUCTION: &str =
    "Increase visual differentiation: tokens, type hierarchy, post cards, controls, and module styling.";

/// One composed, repaired and validated candidate
#[derive(Debug, Clone)]
struct Attempt {
    compose: ComposeResult,
    validation: ValidationResult,
    repaired: usize,
}

/// Per-request pipeline state over a shared template
struct Pipeline<'a> {
    request: &'a GenerateRequest,
    bundle: &'a TemplateBundle,
    provider: &'a dyn OverrideProvider,
    config: &'a ThemblrConfig,
    composer: Composer,
    validator: ThemeValidator,
    context: ValidationContext,
    base_zones: EditableZones,
}

impl<'a> Pipeline<'a> {
    async fn request_overrides(
        &self,
        reduced_scope: bool,
        violations: Vec<String>,
    ) -> Result<OverridePayload, GenerationError> {
        let timeout_ms = self.config.generation_timeout_ms;
        let override_request = OverrideRequest {
            theme_name: self.request.theme_name.clone(),
            slug: self.request.slug.clone(),
            structured: self.request.structured.clone(),
            prompt: self.request.prompt.clone(),
            base_editable_zones: self.base_zones.clone(),
            violations,
            reduced_scope,
            timeout_ms,
        };

        debug!(reduced_scope, "Requesting zone overrides");
        let payload = tokio::time::timeout(
            self.config.generation_timeout(),
            self.provider.generate(override_request),
        )
        .await
        .map_err(|_| GenerationError::Timeout(timeout_ms))??;

        if payload.editable_zones.is_empty() {
            warn!(reduced_scope, "Collaborator returned no zone overrides");
        }
        if !payload.notes.is_empty() {
            debug!(notes = ?payload.notes, "Collaborator notes");
        }
        Ok(payload)
    }

    fn attempt(
        &self,
        overrides: &PartialEditableZones,
        meta_defaults: &BTreeMap<String, String>,
    ) -> Result<Attempt, TemplateError> {
        let base = &self.bundle.template_html;
        let mut compose = self.composer.compose(base, overrides, meta_defaults)?;

        let repair = repair_locked_zones(base, &compose.theme_html)?;
        if repair.repaired_count > 0 {
            warn!(count = repair.repaired_count, "Repaired locked zones");
            compose.theme_html = repair.repaired_html;
        }

        let validation = self.validator.validate(&compose.theme_html, &self.context);
        Ok(Attempt {
            compose,
            validation,
            repaired: repair.repaired_count,
        })
    }

    fn css_ratio(&self, theme_html: &str) -> Option<f64> {
        extract_css_core_lenient(theme_html)
            .map(|css| css_change_ratio(&self.base_zones.css_core, &css))
    }
}

fn count_markup_overrides(overrides: &PartialEditableZones) -> usize {
    MARKUP_ZONES
        .iter()
        .filter(|key| overrides.get(**key).is_some())
        .count()
}

/// Run one generation request against `bundle`.
///
/// Makes one collaborator call, plus at most one more when the first result is
/// either invalid beyond local repair or too similar to the base CSS.
pub async fn generate_theme(
    request: &GenerateRequest,
    bundle: &TemplateBundle,
    provider: &dyn OverrideProvider,
    config: &ThemblrConfig,
) -> Result<GenerateResponse, GenerationError> {
    request.validate()?;

    let base_zones = extract_zones(&bundle.template_html)?.editable_zones;
    let pipeline = Pipeline {
        request,
        bundle,
        provider,
        config,
        composer: Composer::with_policy(config.merge_policy),
        validator: ThemeValidator::default(),
        context: config.validation_context(bundle.base_lang_keys.clone()),
        base_zones,
    };

    let mut repaired = 0;
    let mut retry_count = 0;

    let first_pass = pipeline.request_overrides(false, Vec::new()).await?;
    let mut current = pipeline.attempt(&first_pass.editable_zones, &first_pass.meta_defaults)?;
    repaired += current.repaired;

    if current.validation.passed {
        if let Some(first_ratio) = pipeline.css_ratio(&current.compose.theme_html) {
            if first_ratio < config.min_css_change_ratio {
                retry_count = 1;
                warn!(ratio = first_ratio, "CSS too close to base, requesting distinct pass");

                let distinct_pass = pipeline
                    .request_overrides(
                        true,
                        vec![
                            format!("Similarity score too low ({:.3}).", first_ratio),
                            DIFFERENTIATION_INSTRUCTION.to_string(),
                        ],
                    )
                    .await?;
                let distinct = pipeline.attempt(
                    &distinct_pass.editable_zones.css_only(),
                    &distinct_pass.meta_defaults,
                )?;
                repaired += distinct.repaired;

                if distinct.validation.passed {
                    let distinct_ratio = pipeline
                        .css_ratio(&distinct.compose.theme_html)
                        .unwrap_or(first_ratio);
                    if distinct_ratio > first_ratio {
                        debug!(ratio = distinct_ratio, "Adopted distinct pass");
                        current = distinct;
                    }
                }
            }
        }
    }

    if !current.validation.passed {
        warn!(
            errors = current.validation.errors.len(),
            "First pass invalid, recomposing with CSS only"
        );
        let fallback = pipeline.attempt(
            &first_pass.editable_zones.css_only(),
            &first_pass.meta_defaults,
        )?;
        repaired += fallback.repaired;

        if fallback.validation.passed {
            repaired += count_markup_overrides(&first_pass.editable_zones);
            current = fallback;
        } else {
            retry_count = 1;
            warn!(
                errors = fallback.validation.errors.len(),
                "CSS-only fallback invalid, requesting compliance pass"
            );

            let second_pass = pipeline
                .request_overrides(true, fallback.validation.errors.clone())
                .await?;
            let second = pipeline.attempt(
                &second_pass.editable_zones.css_only(),
                &second_pass.meta_defaults,
            )?;
            repaired += second.repaired;
            current = second;
        }
    }

    let file_name = build_theme_file_name(&request.slug);
    info!(
        file_name = %file_name,
        passed = current.validation.passed,
        retry_count,
        repaired,
        "Generated theme"
    );

    Ok(GenerateResponse {
        file_name,
        theme_html: current.compose.theme_html,
        validation: current.validation,
        report: GenerationReport {
            locked_regions_repaired: repaired,
            retry_count,
            changed_regions: current.compose.changed_regions,
        },
    })
}
