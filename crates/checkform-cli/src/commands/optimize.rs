//! Optimize command implementation.

use crate::cli::OptimizeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use checkform_eval::load_records;
use checkform_extractor::{PdfRenderer, PromptBuilder};
use checkform_optimizer::{OptimizerConfig, PromptOptimizer, TerminalState};
use std::fs;
use tracing::info;

/// Execute the optimize command.
pub async fn execute_optimize(
    args: OptimizeArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    for (path, what) in [(&args.sample, "Sample"), (&args.ground_truth, "Ground truth")] {
        if !path.exists() {
            return Err(CliError::InvalidInput(format!(
                "{} file '{}' not found",
                what,
                path.display()
            )));
        }
    }

    let ground_truth = load_records(&args.ground_truth)?;
    let sample_png = load_sample_image(&args, config)?;

    let seed_prompt = match &args.seed_file {
        Some(path) => fs::read_to_string(path)?,
        None => PromptBuilder::new().seed().to_string(),
    };

    let rounds = args.rounds.unwrap_or(config.optimization.max_rounds);
    if rounds == 0 {
        return Err(CliError::InvalidInput(
            "Round budget must be at least 1".to_string(),
        ));
    }

    info!(
        "Optimizing prompt over {} with {} ground-truth records, {} round budget",
        args.sample.display(),
        ground_truth.len(),
        rounds
    );

    let extractor = super::build_extractor(config, args.model.as_deref())?;
    let optimizer_config = OptimizerConfig {
        min_precision: config.evaluation.min_precision,
        min_recall: config.evaluation.min_recall,
        retry_backoff_secs: config.optimization.retry_backoff_secs,
        similarity_threshold: config.evaluation.similarity_threshold,
    };
    optimizer_config.validate().map_err(CliError::Config)?;

    let optimizer = PromptOptimizer::new(extractor, optimizer_config);
    let result = optimizer
        .optimize(&seed_prompt, &sample_png, &ground_truth, rounds)
        .await;

    super::ensure_parent_dir(&args.output)?;
    fs::write(&args.output, &result.best_prompt)?;
    super::ensure_parent_dir(&args.metrics_output)?;
    fs::write(&args.metrics_output, serde_json::to_string_pretty(&result)?)?;

    println!("{}", formatter.format_history(&result)?);
    println!("{}", formatter.format_metrics(&result.best_metrics)?);
    println!(
        "{}",
        formatter.requirement_check(
            &result.best_metrics,
            config.evaluation.min_precision,
            config.evaluation.min_recall,
        )
    );
    println!(
        "{}",
        formatter.success(&format!(
            "Optimized prompt saved to {}; metrics saved to {}",
            args.output.display(),
            args.metrics_output.display()
        ))
    );

    if result.outcome == TerminalState::ExtractorFailed {
        return Err(CliError::Config(
            "Optimization stopped on a terminal extractor failure; see the round history"
                .to_string(),
        ));
    }

    Ok(())
}

/// Load the sample as one PNG page; PDFs use their first page.
fn load_sample_image(args: &OptimizeArgs, config: &Config) -> Result<Vec<u8>> {
    let extension = args
        .sample
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if extension == "pdf" {
        let renderer = PdfRenderer::new()?;
        let pages = renderer.render_pages(&args.sample, config.extraction.dpi, 1)?;
        let page = pages.into_iter().next().ok_or_else(|| {
            CliError::InvalidInput(format!("'{}' has no pages", args.sample.display()))
        })?;
        Ok(page.png_data)
    } else {
        Ok(fs::read(&args.sample)?)
    }
}
