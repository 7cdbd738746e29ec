//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Evaluation boundary error
    #[error("Evaluation error: {0}")]
    Eval(#[from] checkform_eval::EvalError),

    /// Extraction error
    #[error("Extraction error: {0}")]
    Extractor(#[from] checkform_extractor::ExtractorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No API credential available
    #[error("API key not found. Set the '{0}' environment variable.")]
    MissingApiKey(String),

    /// Metrics fell short of the configured precision/recall requirements
    #[error("Extraction performance does not meet the configured requirements")]
    RequirementsNotMet,
}
