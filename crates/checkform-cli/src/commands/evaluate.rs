//! Evaluate command implementation.

use crate::cli::EvaluateArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use checkform_eval::{load_records, match_records_with_threshold, score};
use std::fs;
use tracing::info;

/// Execute the evaluate command.
pub async fn execute_evaluate(
    args: EvaluateArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    for (path, what) in [
        (&args.predictions, "Predictions"),
        (&args.ground_truth, "Ground truth"),
    ] {
        if !path.exists() {
            return Err(CliError::InvalidInput(format!(
                "{} file '{}' not found",
                what,
                path.display()
            )));
        }
    }

    info!(
        "Evaluating {} against {}",
        args.predictions.display(),
        args.ground_truth.display()
    );

    let predictions = load_records(&args.predictions)?;
    let ground_truth = load_records(&args.ground_truth)?;

    let outcome = match_records_with_threshold(
        &predictions,
        &ground_truth,
        config.evaluation.similarity_threshold,
    );
    let metrics = score(&outcome);

    super::ensure_parent_dir(&args.output)?;
    fs::write(&args.output, serde_json::to_string_pretty(&metrics)?)?;

    println!("{}", formatter.format_metrics(&metrics)?);
    println!(
        "{}",
        formatter.requirement_check(
            &metrics,
            config.evaluation.min_precision,
            config.evaluation.min_recall,
        )
    );
    println!(
        "{}",
        formatter.info(&format!("Metrics saved to {}", args.output.display()))
    );

    if !metrics.meets(config.evaluation.min_precision, config.evaluation.min_recall) {
        return Err(CliError::RequirementsNotMet);
    }

    Ok(())
}
