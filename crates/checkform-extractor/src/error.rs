//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Vision provider error; `transient` marks rate-limit/quota/timeout
    /// failures worth one retry
    #[error("Vision model error: {message}")]
    Vision {
        /// Provider-reported failure text
        message: String,
        /// Whether a retry after backoff could succeed
        transient: bool,
    },

    /// Model call exceeded the configured timeout
    #[error("Extraction timeout")]
    Timeout,

    /// PDF could not be loaded or rasterized
    #[error("Render error: {0}")]
    Render(String),

    /// Model returned no recoverable checkbox JSON
    #[error("Invalid response format: {0}")]
    Parse(String),

    /// Input file type is not handled
    #[error("Unsupported input '{0}': expected a PDF or image file")]
    UnsupportedInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractorError {
    /// Whether this failure is worth retrying after a backoff
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ExtractorError::Vision { transient: true, .. } | ExtractorError::Timeout
        )
    }

    /// Whether this is a model-output parse failure, which the optimizer
    /// scores as an empty prediction set rather than a crash
    pub fn is_parse(&self) -> bool {
        matches!(self, ExtractorError::Parse(_))
    }
}
