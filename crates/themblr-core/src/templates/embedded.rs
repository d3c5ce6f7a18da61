//! Starter theme compiled into the binary

/// Reference starter theme - loaded from templates/starter_theme.html
pub const STARTER_THEME: &str = include_str!("../../templates/starter_theme.html");

/// Path reported for the embedded starter theme
pub const EMBEDDED_TEMPLATE_PATH: &str = "embedded:starter_theme.html";
