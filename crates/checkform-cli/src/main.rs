//! Checkform CLI - checkbox extraction, evaluation, and prompt optimization
//! for ACORD 25 forms.

use checkform_cli::commands;
use checkform_cli::{Cli, Command, Config, Formatter};
use clap::Parser;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> checkform_cli::Result<()> {
    let cli = Cli::parse();

    // Load config from the explicit path or the default location
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|_| {
            let cfg = Config::default();
            cfg.save().ok();
            cfg
        }),
    };

    // Determine output format and color setting
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Extract(args) => {
            commands::execute_extract(args, &config, &formatter).await?;
        }
        Command::Batch(args) => {
            commands::execute_batch(args, &config, &formatter).await?;
        }
        Command::Evaluate(args) => {
            commands::execute_evaluate(args, &config, &formatter).await?;
        }
        Command::Optimize(args) => {
            commands::execute_optimize(args, &config, &formatter).await?;
        }
    }

    Ok(())
}
