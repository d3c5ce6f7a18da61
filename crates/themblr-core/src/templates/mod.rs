//! Starter template sources

pub mod embedded;
pub mod loader;

pub use embedded::STARTER_THEME;
pub use loader::{
    load_starter_template, load_template_at, resolve_starter_theme_path, starter_theme_candidates,
    template_metadata, TemplateBundle, TemplateMetadata,
};
