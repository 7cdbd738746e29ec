//! Batch command implementation.

use crate::cli::BatchArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use checkform_extractor::PromptBuilder;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const FORM_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "tiff", "bmp"];

/// Execute the batch command.
pub async fn execute_batch(args: BatchArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    if !args.input_dir.is_dir() {
        return Err(CliError::InvalidInput(format!(
            "Input directory '{}' not found",
            args.input_dir.display()
        )));
    }

    let inputs = collect_form_files(&args.input_dir)?;
    if inputs.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "No PDF or image files found in '{}'",
            args.input_dir.display()
        )));
    }

    info!(
        "Batch processing {} form(s) from {}",
        inputs.len(),
        args.input_dir.display()
    );

    let extractor = super::build_extractor(config, args.model.as_deref())?;
    let prompt = PromptBuilder::new().build();

    let outcome = extractor.batch(&inputs, &prompt).await;

    fs::create_dir_all(&args.output_dir)?;
    let output_path = args.output_dir.join("batch_results.json");

    let results: Vec<_> = outcome
        .results
        .iter()
        .map(|r| {
            json!({
                "source_id": r.source_id,
                "checkboxes": r.records.iter().map(|c| json!({
                    "section": c.section,
                    "label": c.label,
                    "is_checked": c.is_checked,
                })).collect::<Vec<_>>(),
            })
        })
        .collect();
    let failures: Vec<_> = outcome
        .failures
        .iter()
        .map(|f| json!({"source_id": f.source_id, "reason": f.reason}))
        .collect();

    fs::write(
        &output_path,
        serde_json::to_string_pretty(&json!({
            "results": results,
            "failures": failures,
        }))?,
    )?;

    println!("{}", formatter.format_batch(&outcome));
    println!(
        "{}",
        formatter.success(&format!(
            "Processed {} form(s), {} failed; results saved to {}",
            outcome.results.len(),
            outcome.failures.len(),
            output_path.display()
        ))
    );

    Ok(())
}

/// Collect form files from a directory, sorted by name for stable output.
fn collect_form_files(dir: &std::path::Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if FORM_EXTENSIONS.contains(&extension.as_str()) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
