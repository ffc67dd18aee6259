use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use tokio::io::AsyncWriteExt;

use super::spec_resolver;
use crate::{
  config::load_config,
  generator::{BuilderType, TemplateContext, create_builder},
  ui::{Colors, GenerateCommand},
  utils::STDIN_LOCATION,
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub template_type: BuilderType,
  pub config: String,
  pub package: Option<PathBuf>,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      template_type,
      config,
      package,
      verbose,
      quiet,
    } = command;

    Ok(Self {
      template_type: BuilderType::parse(&template_type)?,
      config,
      package,
      verbose,
      quiet,
    })
  }
}

/// Progress goes to stderr so stdout carries only the rendered template.
struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      eprintln!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        message.with(self.colors.primary())
      );
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      eprintln!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading_config(&self) {
    let source = if self.config.config == STDIN_LOCATION { "stdin" } else { self.config.config.as_str() };
    self.info(&format!("Loading configuration from: {source}"));
  }

  fn log_loading_spec(&self, location: &str) {
    self.info(&format!("Loading OpenAPI spec from: {location}"));
  }

  fn log_building(&self) {
    self.info(&format!("Building {} template...", self.config.template_type));
  }

  fn print_statistics(&self, props: &TemplateContext) {
    self.stat("Endpoints:", props.endpoints.len().to_string());
    self.stat("Hosts:", props.hosts.join(", "));

    if self.config.verbose {
      for key in props.endpoints.keys() {
        eprintln!("              {}", key.as_str().with(self.colors.muted()));
      }
    }
  }

  fn log_writing(&self, output: &Path) {
    self.info(&format!("Writing package to: {}", output.display()));
  }

  fn print_files(&self, files: &[PathBuf]) {
    self.stat("Files written:", files.len().to_string());

    if self.config.verbose {
      for file in files {
        eprintln!("              {}", file.display().to_string().with(self.colors.muted()));
      }
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      eprintln!();
      eprintln!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        format!("Successfully generated {} template", self.config.template_type).with(self.colors.success())
      );
    }
  }
}

pub async fn generate_dashboard(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading_config();
  let settings = load_config(&config.config).await?;

  logger.log_loading_spec(&settings.oa3_spec);
  let (resolver, _download) = spec_resolver(&settings.oa3_spec).await?;

  logger.log_building();
  let mut builder = create_builder(config.template_type, settings.settings(), &resolver).await?;
  let overrides = settings.overrides();

  match &config.package {
    Some(output) => {
      logger.log_writing(output);
      let files = builder.package(output, &overrides).await?;
      logger.print_statistics(builder.props());
      logger.print_files(&files);
    }
    None => {
      let rendered = builder.produce(&overrides)?;
      logger.print_statistics(builder.props());

      let mut stdout = tokio::io::stdout();
      stdout
        .write_all(rendered.as_bytes())
        .await
        .context("Failed to write template to stdout")?;
      stdout.flush().await.context("Failed to write template to stdout")?;
    }
  }

  logger.log_success();
  Ok(())
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::ui::colors::Theme;

  fn command(template_type: &str, package: Option<PathBuf>) -> GenerateCommand {
    GenerateCommand {
      template_type: template_type.to_string(),
      config: "opex.yaml".to_string(),
      package,
      verbose: false,
      quiet: true,
    }
  }

  fn write_config(dir: &Path) -> String {
    let spec = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
      .join("fixtures")
      .join("petstore.yaml");
    let config = format!(
      "oa3_spec: {}\nname: Petstore\nlocation: West Europe\ndata_source: /subscriptions/uuid/agw\naction_groups:\n  - /ag/one\n",
      spec.display()
    );
    let path = dir.join("opex.yaml");
    std::fs::write(&path, config).unwrap();
    path.display().to_string()
  }

  #[test]
  fn test_from_command_parses_template_type() {
    let config = GenerateConfig::from_command(command("azure-dashboard", None)).unwrap();
    assert_eq!(config.template_type, BuilderType::AzureDashboard);
    assert!(config.quiet);
  }

  #[test]
  fn test_from_command_rejects_unknown_template_type() {
    let err = GenerateConfig::from_command(command("grafana", None)).unwrap_err();
    assert_eq!(err.to_string(), "Invalid builder error: unknown builder grafana");
  }

  #[tokio::test]
  async fn test_generate_package() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    let mut config = GenerateConfig::from_command(command("azure-dashboard", Some(output.clone()))).unwrap();
    config.config = write_config(dir.path());

    generate_dashboard(config, &Colors::new(false, Theme::Dark)).await.unwrap();

    let module = std::fs::read_to_string(output.join("opex.tf")).unwrap();
    assert!(module.contains("resource \"azurerm_portal_dashboard\" \"this\""));
    assert!(output.join("main.tf").exists());
    assert!(output.join("variables.tf").exists());
  }

  #[tokio::test]
  async fn test_raw_builder_cannot_package() {
    let dir = tempfile::tempdir().unwrap();
    let mut config =
      GenerateConfig::from_command(command("azure-dashboard-raw", Some(dir.path().join("out")))).unwrap();
    config.config = write_config(dir.path());

    let err = generate_dashboard(config, &Colors::new(false, Theme::Dark))
      .await
      .unwrap_err();
    assert!(err.to_string().starts_with("Packaging not supported for RawDashboardBuilder"));
    assert!(!dir.path().join("out").exists());
  }

  #[tokio::test]
  async fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = GenerateConfig::from_command(command("azure-dashboard", None)).unwrap();
    config.config = dir.path().join("missing.yaml").display().to_string();

    let err = generate_dashboard(config, &Colors::new(false, Theme::Dark))
      .await
      .unwrap_err();
    assert!(err.to_string().starts_with("Failed to read config file: "));
  }
}
