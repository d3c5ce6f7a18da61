//! Themblr core pipeline
//!
//! Turns a fixed Tumblr starter theme plus untrusted zone overrides into a
//! contract-checked theme document. The starter template is split into
//! editable zones (CSS core, header, sidebar, context) and locked zones
//! (post rendering, JS core, root tag); overrides only ever touch the former.

pub mod blocks;
pub mod config;
pub mod contracts;
pub mod error;
pub mod generation;
pub mod naming;
pub mod templates;
pub mod validator;
pub mod zones;

pub use config::ThemblrConfig;
pub use error::{GenerationError, ProviderError, TemplateError};
pub use generation::{
    css_change_ratio, generate_theme, OverridePayload, OverrideProvider, OverrideRequest,
    ReplayProvider,
};
pub use templates::{load_starter_template, template_metadata, TemplateBundle, TemplateMetadata};
pub use validator::{validate_theme_html, ThemeValidator, ValidationContext};
pub use zones::{
    compose_template, extract_zones, repair_locked_zones, ComposeResult, Composer,
    CssMergePolicy, RepairResult, ThresholdMergePolicy, ZoneExtraction,
};
