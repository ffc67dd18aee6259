#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;

use crate::ui::{Cli, Colors, Commands, ListCommands, colors};

mod config;
mod error;
mod generator;
mod spec;
mod ui;
mod utils;

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  let theme = colors::detect_theme(cli.theme);
  let stderr_colors = Colors::new(colors::colors_enabled(cli.color, &std::io::stderr()), theme);

  let result = match cli.command {
    Commands::List { list_command } => match list_command {
      ListCommands::Endpoints { config } => {
        let stdout_colors = Colors::new(colors::colors_enabled(cli.color, &std::io::stdout()), theme);
        ui::commands::list_endpoints(&config, &stdout_colors).await
      }
    },
    Commands::Generate(command) => match ui::commands::GenerateConfig::from_command(command) {
      Ok(config) => ui::commands::generate_dashboard(config, &stderr_colors).await,
      Err(err) => Err(err),
    },
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("{} {err:#}", "Error:".with(stderr_colors.accent()));
      ExitCode::FAILURE
    }
  }
}
