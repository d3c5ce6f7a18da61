//! Error types for template handling and generation

use thiserror::Error;

/// Defects of the installed starter template (configuration errors)
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Unable to extract {0} from starter template")]
    MissingAnchor(&'static str),

    #[error("Starter style block is missing {{CustomCSS}} marker")]
    MissingCustomCssMarker,

    #[error("Unable to locate starter theme.html. Set STARTER_THEME_PATH or ensure ../defaultera/theme.html exists.")]
    StarterNotFound,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failures of the override collaborator
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Collaborator returned non-JSON output")]
    NonJson,

    #[error("Collaborator output does not match the override schema: {0}")]
    Schema(String),

    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Collaborator timed out after {0}ms")]
    Timeout(u64),

    #[error("No recorded payload left for call {0}")]
    Exhausted(usize),

    #[error("Internal collaborator error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Fatal outcomes of a generation run.
///
/// A document that merely fails validation is not an error; it is returned
/// in the response with `validation.passed == false`.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Template configuration error: {0}")]
    Configuration(#[from] TemplateError),

    #[error("Override collaborator failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Generation timed out after {0}ms")]
    Timeout(u64),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] themblr_types::RequestError),
}

impl GenerationError {
    /// True for defects of the installed template or service configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GenerationError::Configuration(_)
                | GenerationError::Provider(ProviderError::MissingConfiguration(_))
        )
    }

    /// True when the collaborator call exceeded its time budget
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            GenerationError::Timeout(_) | GenerationError::Provider(ProviderError::Timeout(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_message_names_the_anchor() {
        let err = TemplateError::MissingAnchor("header section");
        assert_eq!(
            err.to_string(),
            "Unable to extract header section from starter template"
        );
        assert_eq!(
            TemplateError::MissingCustomCssMarker.to_string(),
            "Starter style block is missing {CustomCSS} marker"
        );
    }

    #[test]
    fn test_classification() {
        let config: GenerationError = TemplateError::MissingAnchor("jsCore").into();
        assert!(config.is_configuration());
        assert!(!config.is_timeout());

        let missing_key: GenerationError =
            ProviderError::MissingConfiguration("OPENAI_API_KEY is missing".into()).into();
        assert!(missing_key.is_configuration());

        assert!(GenerationError::Timeout(20_000).is_timeout());
        assert!(GenerationError::from(ProviderError::Timeout(5)).is_timeout());
        assert!(!GenerationError::from(ProviderError::NonJson).is_configuration());
    }
}
