use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "opex-dashboard")]
#[command(author, version, about = "Operational dashboards and alarms from OpenAPI specifications")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information derived from the configured OpenAPI specification
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate a dashboard definition from an OpenAPI specification
  Generate(GenerateCommand),
}

#[derive(clap::Args, Debug)]
pub struct GenerateCommand {
  /// Template type: azure-dashboard or azure-dashboard-raw
  #[arg(short, long, value_name = "TYPE")]
  pub template_type: String,

  /// Path to the YAML configuration file (use - for stdin)
  #[arg(short, long, value_name = "FILE")]
  pub config: String,

  /// Save the template as a package in the given directory (default: current directory)
  #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = ".")]
  pub package: Option<PathBuf>,

  /// Enable verbose output with per-endpoint and per-file detail
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List the endpoints a dashboard would monitor
  Endpoints {
    /// Path to the YAML configuration file (use - for stdin)
    #[arg(short, long, value_name = "FILE")]
    config: String,
  },
}
