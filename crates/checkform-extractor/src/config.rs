//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Rasterization density for PDF pages (dots per inch)
    pub dpi: u32,

    /// Maximum time for a single model call (seconds)
    pub request_timeout_secs: u64,

    /// Worker-pool width for batch extraction; bounded by the external
    /// API's rate limits
    pub max_concurrency: usize,

    /// Maximum pages rendered per document
    pub max_pages: usize,
}

impl ExtractorConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.dpi == 0 {
            return Err("dpi must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        if self.max_pages == 0 {
            return Err("max_pages must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            dpi: 150,
            request_timeout_secs: 120,
            max_concurrency: 4,
            max_pages: 8,
        }
    }
}

impl ExtractorConfig {
    /// High-detail preset: denser rasterization, longer timeout
    pub fn high_detail() -> Self {
        Self {
            dpi: 300,
            request_timeout_secs: 300,
            max_concurrency: 2,
            max_pages: 8,
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_high_detail_config_is_valid() {
        let config = ExtractorConfig::high_detail();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_dpi() {
        let mut config = ExtractorConfig::default();
        config.dpi = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_concurrency() {
        let mut config = ExtractorConfig::default();
        config.max_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.dpi, parsed.dpi);
        assert_eq!(config.request_timeout_secs, parsed.request_timeout_secs);
        assert_eq!(config.max_concurrency, parsed.max_concurrency);
    }
}
