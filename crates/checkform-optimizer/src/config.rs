//! Configuration for the optimizer

use serde::{Deserialize, Serialize};

/// Configuration for the optimization loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Precision the extraction must reach for the target to be met
    pub min_precision: f64,

    /// Recall the extraction must reach for the target to be met
    pub min_recall: f64,

    /// Seconds to wait before retrying a round after a transient
    /// extractor failure; one retry per round
    pub retry_backoff_secs: u64,

    /// Similarity threshold handed to the matcher's fuzzy fallback
    pub similarity_threshold: f64,
}

impl OptimizerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_precision) {
            return Err("min_precision must be within [0.0, 1.0]".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_recall) {
            return Err("min_recall must be within [0.0, 1.0]".to_string());
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err("similarity_threshold must be within [0.0, 1.0]".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for OptimizerConfig {
    /// Defaults mirror the documented extraction requirements:
    /// precision of at least 97%, recall of at least 90%
    fn default() -> Self {
        Self {
            min_precision: 0.97,
            min_recall: 0.90,
            retry_backoff_secs: 5,
            similarity_threshold: checkform_eval::DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}
