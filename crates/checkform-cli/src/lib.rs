//! Checkform CLI library - command-line plumbing for extraction,
//! evaluation, and prompt optimization over ACORD 25 forms.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat, Command};
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
