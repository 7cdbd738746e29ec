//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Extraction settings
    #[serde(default)]
    pub extraction: ExtractionSettings,

    /// Evaluation thresholds
    #[serde(default)]
    pub evaluation: EvaluationSettings,

    /// Optimization settings
    #[serde(default)]
    pub optimization: OptimizationSettings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// Vision model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// PDF rasterization density
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Timeout per model call (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Provider-level retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Batch worker-pool width
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Maximum pages rendered per document
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

/// Evaluation thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSettings {
    /// Required precision
    #[serde(default = "default_min_precision")]
    pub min_precision: f64,

    /// Required recall
    #[serde(default = "default_min_recall")]
    pub min_recall: f64,

    /// Fuzzy matcher similarity threshold
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

/// Optimization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationSettings {
    /// Default round budget
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,

    /// Backoff before the per-round transient retry (seconds)
    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,
}

/// Output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".checkform").join("config.toml"))
    }

    /// Load configuration from the default path or create defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            dpi: default_dpi(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            concurrency: default_concurrency(),
            max_pages: default_max_pages(),
        }
    }
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            min_precision: default_min_precision(),
            min_recall: default_min_recall(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            retry_backoff_secs: default_retry_backoff_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_dpi() -> u32 {
    150
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    3
}

fn default_concurrency() -> usize {
    4
}

fn default_max_pages() -> usize {
    8
}

fn default_min_precision() -> f64 {
    0.97
}

fn default_min_recall() -> f64 {
    0.90
}

fn default_similarity_threshold() -> f64 {
    checkform_eval::DEFAULT_SIMILARITY_THRESHOLD
}

fn default_max_rounds() -> usize {
    3
}

fn default_retry_backoff_secs() -> u64 {
    5
}
