//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Checkform - extract, evaluate, and optimize checkbox extraction from
/// ACORD 25 Certificate of Liability Insurance forms.
#[derive(Debug, Parser)]
#[command(name = "checkform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CHECKFORM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (minimal)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract checkbox data from a single ACORD 25 form
    Extract(ExtractArgs),

    /// Process multiple ACORD 25 forms in batch
    Batch(BatchArgs),

    /// Evaluate extraction output against labeled ground truth
    Evaluate(EvaluateArgs),

    /// Optimize the extraction prompt against a labeled sample
    Optimize(OptimizeArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Path to the input PDF or image file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to save the extraction results
    #[arg(short, long, default_value = "results/extraction_results.json")]
    pub output: PathBuf,

    /// Vision model to use (overrides the configured default)
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// Directory containing ACORD 25 forms
    #[arg(short, long)]
    pub input_dir: PathBuf,

    /// Directory to save the extraction results
    #[arg(short, long, default_value = "results")]
    pub output_dir: PathBuf,

    /// Vision model to use (overrides the configured default)
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments for the evaluate command.
#[derive(Debug, Parser)]
pub struct EvaluateArgs {
    /// Path to the predictions JSON file
    #[arg(short, long)]
    pub predictions: PathBuf,

    /// Path to the ground truth JSON file
    #[arg(short, long)]
    pub ground_truth: PathBuf,

    /// Path to save the metrics
    #[arg(short, long, default_value = "results/performance_metrics.json")]
    pub output: PathBuf,
}

/// Arguments for the optimize command.
#[derive(Debug, Parser)]
pub struct OptimizeArgs {
    /// Path to the sample form (PDF or image); PDFs use page 1
    #[arg(short = 'i', long)]
    pub sample: PathBuf,

    /// Path to the ground truth JSON file
    #[arg(short, long)]
    pub ground_truth: PathBuf,

    /// Number of optimization rounds (overrides the configured default)
    #[arg(short = 'n', long)]
    pub rounds: Option<usize>,

    /// Seed prompt file; defaults to the built-in ACORD 25 template
    #[arg(short, long)]
    pub seed_file: Option<PathBuf>,

    /// Path to save the optimized prompt
    #[arg(short, long, default_value = "results/optimized_prompt.txt")]
    pub output: PathBuf,

    /// Path to save the optimization metrics and round history
    #[arg(short = 'M', long, default_value = "results/optimization_metrics.json")]
    pub metrics_output: PathBuf,

    /// Vision model to use (overrides the configured default)
    #[arg(short, long)]
    pub model: Option<String>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command_parsing() {
        let cli = Cli::parse_from(["checkform", "extract", "-i", "form.pdf"]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.input, PathBuf::from("form.pdf"));
                assert_eq!(
                    args.output,
                    PathBuf::from("results/extraction_results.json")
                );
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_evaluate_command_parsing() {
        let cli = Cli::parse_from([
            "checkform",
            "evaluate",
            "-p",
            "pred.json",
            "-g",
            "truth.json",
        ]);
        match cli.command {
            Command::Evaluate(args) => {
                assert_eq!(args.predictions, PathBuf::from("pred.json"));
                assert_eq!(args.ground_truth, PathBuf::from("truth.json"));
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_optimize_command_parsing() {
        let cli = Cli::parse_from([
            "checkform",
            "optimize",
            "-i",
            "sample.png",
            "-g",
            "truth.json",
            "-n",
            "5",
        ]);
        match cli.command {
            Command::Optimize(args) => {
                assert_eq!(args.rounds, Some(5));
                assert!(args.seed_file.is_none());
            }
            _ => panic!("Expected Optimize command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "checkform",
            "--no-color",
            "extract",
            "-i",
            "form.pdf",
        ]);
        assert!(cli.no_color);
        assert!(cli.format.is_none());
    }
}
