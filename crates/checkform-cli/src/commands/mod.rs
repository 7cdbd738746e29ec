//! CLI command implementations.

mod batch;
mod evaluate;
mod extract;
mod optimize;

pub use batch::execute_batch;
pub use evaluate::execute_evaluate;
pub use extract::execute_extract;
pub use optimize::execute_optimize;

use crate::config::Config;
use crate::error::{CliError, Result};
use checkform_extractor::{CheckboxExtractor, ExtractorConfig};
use checkform_llm::GeminiProvider;

/// Build the configured vision provider; the credential always comes from
/// the environment, never from a file.
pub(crate) fn build_provider(config: &Config, model_override: Option<&str>) -> Result<GeminiProvider> {
    let model = model_override.unwrap_or(&config.extraction.model);
    let api_key = std::env::var(&config.extraction.api_key_env)
        .map_err(|_| CliError::MissingApiKey(config.extraction.api_key_env.clone()))?;

    Ok(GeminiProvider::new(model, api_key).with_max_retries(config.extraction.max_retries))
}

/// Build the extractor from CLI configuration.
pub(crate) fn build_extractor(
    config: &Config,
    model_override: Option<&str>,
) -> Result<CheckboxExtractor<GeminiProvider>> {
    let provider = build_provider(config, model_override)?;
    let model = model_override
        .unwrap_or(&config.extraction.model)
        .to_string();

    let extractor_config = ExtractorConfig {
        dpi: config.extraction.dpi,
        request_timeout_secs: config.extraction.timeout_secs,
        max_concurrency: config.extraction.concurrency,
        max_pages: config.extraction.max_pages,
    };
    extractor_config
        .validate()
        .map_err(CliError::Config)?;

    Ok(CheckboxExtractor::new(provider, extractor_config).with_model_name(model))
}

/// Create the parent directory of an output path if needed.
pub(crate) fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
