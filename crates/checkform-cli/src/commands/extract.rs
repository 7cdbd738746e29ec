//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use checkform_extractor::PromptBuilder;
use tracing::info;

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    if !args.input.exists() {
        return Err(CliError::InvalidInput(format!(
            "Input file '{}' not found",
            args.input.display()
        )));
    }

    info!("Extracting checkbox data from {}", args.input.display());

    let extractor = super::build_extractor(config, args.model.as_deref())?;
    let prompt = PromptBuilder::new().build();

    let result = extractor.extract_form(&args.input, &prompt).await?;

    super::ensure_parent_dir(&args.output)?;
    checkform_eval::write_records(&args.output, &result.records)?;

    println!("{}", formatter.format_records(&result.records)?);
    println!(
        "{}",
        formatter.success(&format!(
            "Extracted {} checkbox(es) from {} page(s) in {}ms; results saved to {}",
            result.records.len(),
            result.metadata.pages,
            result.metadata.processing_time_ms,
            args.output.display()
        ))
    );

    Ok(())
}
