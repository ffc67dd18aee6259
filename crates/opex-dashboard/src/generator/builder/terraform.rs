use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use super::{Builder, BuilderBase, DashboardSettings, RawDashboardBuilder};
use crate::{
  config::TerraformConfig,
  error::{Error, Result},
  generator::{context::TemplateContext, overrides::Overrides, packager::generate_assets, templates::render_terraform},
  utils::resource_name,
};

pub const MODULE_FILE: &str = "opex.tf";

/// Wraps a [`RawDashboardBuilder`] into a Terraform module with alerts.
#[derive(Debug, Clone)]
pub struct TerraformDashboardBuilder {
  base: BuilderBase,
  raw: RawDashboardBuilder,
  terraform: Option<TerraformConfig>,
}

impl TerraformDashboardBuilder {
  pub fn new(raw: RawDashboardBuilder, settings: DashboardSettings) -> Self {
    let properties = TemplateContext {
      action_groups_ids: settings.action_groups_ids,
      availability_threshold: settings.availability_threshold,
      data_source_id: settings.data_source_id,
      evaluation_frequency: settings.evaluation.frequency,
      evaluation_time_window: settings.evaluation.time_window,
      event_occurrences: settings.evaluation.event_occurrences,
      location: settings.location,
      name: resource_name(&settings.name),
      queries: settings.queries,
      resource_type: settings.resource_type,
      response_time_threshold: settings.response_time_threshold,
      timespan: settings.timespan,
      ..TemplateContext::default()
    };

    Self {
      base: BuilderBase::new(render_terraform, properties),
      raw,
      terraform: settings.terraform,
    }
  }
}

#[async_trait]
impl Builder for TerraformDashboardBuilder {
  fn name(&self) -> &'static str {
    "TerraformDashboardBuilder"
  }

  fn produce(&mut self, overrides: &Overrides) -> Result<String> {
    let dashboard: Value = serde_json::from_str(&self.raw.produce(overrides)?)
      .map_err(|e| Error::config(format!("Invalid dashboard document: {e}")))?;
    let properties = dashboard
      .get("properties")
      .ok_or_else(|| Error::config("Dashboard document has no \"properties\""))?;
    let properties =
      serde_json::to_string_pretty(properties).map_err(|e| Error::config(format!("Invalid dashboard document: {e}")))?;

    let raw = self.raw.props();
    let props = self.base.props_mut();
    props.dashboard_properties = Some(properties);
    props.hosts.clone_from(&raw.hosts);
    props.endpoints.clone_from(&raw.endpoints);

    self.base.render(&overrides.normalized())
  }

  async fn package(&mut self, output: &Path, overrides: &Overrides) -> Result<Vec<PathBuf>> {
    let module = self.produce(overrides)?;

    tokio::fs::create_dir_all(output)
      .await
      .map_err(|e| Error::file(output, format!("Failed to create output directory: {e}")))?;
    let module_path = output.join(MODULE_FILE);
    tokio::fs::write(&module_path, module)
      .await
      .map_err(|e| Error::file(&module_path, format!("Failed to write Terraform module: {e}")))?;

    let mut written = vec![module_path];
    written.extend(generate_assets(output, self.terraform.as_ref()).await?);
    Ok(written)
  }

  fn props(&self) -> &TemplateContext {
    self.base.props()
  }
}

#[cfg(test)]
mod tests {
  use indexmap::IndexMap;
  use pretty_assertions::assert_eq;
  use serde_json::json;

  use super::*;
  use crate::{
    config::{BackendConfig, EnvironmentConfig},
    generator::context::Endpoint,
    spec::ResolvedSpec,
  };

  fn settings() -> DashboardSettings {
    DashboardSettings::builder()
      .name("PROD IO, dashboard")
      .location("West Europe")
      .data_source_id("/subscriptions/uuid/agw")
      .action_groups_ids(vec!["/ag/one".to_string()])
      .build()
  }

  fn builder(settings: DashboardSettings) -> TerraformDashboardBuilder {
    let spec = ResolvedSpec::new(json!({
      "openapi": "3.0.0",
      "servers": [{"url": "https://svc.example.com/api"}],
      "paths": {"/users/{id}": {"get": {}}, "/health": {"get": {}}}
    }));
    let raw = RawDashboardBuilder::new(spec, &settings).unwrap();
    TerraformDashboardBuilder::new(raw, settings)
  }

  #[test]
  fn test_produce_embeds_dashboard_properties() {
    let mut builder = builder(settings());
    let module = builder.produce(&Overrides::default()).unwrap();

    assert!(module.contains("\"${var.prefix}-${var.env_short}-PROD_IO_dashboard\""));
    assert!(module.contains("  dashboard_properties = <<-PROPS\n    {\n  \"lenses\": {"));
    assert!(module.contains("\"alarm_availability_0\""));
    assert!(module.contains("\"alarm_time_1\""));
    assert!(module.contains("-availability @ /api/users/{id}"));
    assert_eq!(builder.props().hosts, vec!["svc.example.com"]);
    assert_eq!(builder.props().endpoints.len(), 2);
  }

  #[test]
  fn test_overrides_reach_alarms() {
    let mut builder = builder(settings());
    let overrides = Overrides {
      endpoints: Some(IndexMap::from([(
        "POST /api/users/{id}".to_string(),
        Endpoint {
          response_time_threshold: Some(2.5),
          response_time_evaluation_frequency: Some(30),
          ..Endpoint::default()
        },
      )])),
      ..Overrides::default()
    };

    let module = builder.produce(&overrides).unwrap();
    assert!(module.contains("Response time for /api/users/{id} is less than or equal to 2.5s"));
    assert!(module.contains("| where httpMethod_s == \"POST\""));
    assert!(module.contains("  frequency   = 30\n"));
  }

  #[tokio::test]
  async fn test_package_writes_module_and_assets() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("opex");
    let settings = DashboardSettings {
      terraform: Some(TerraformConfig {
        environments: Some(IndexMap::from([
          (
            "dev".to_string(),
            Some(EnvironmentConfig {
              prefix: Some("io".to_string()),
              env_short: Some("d".to_string()),
              backend: Some(BackendConfig {
                resource_group_name: Some("terraform-state-rg".to_string()),
                ..BackendConfig::default()
              }),
            }),
          ),
          ("prod".to_string(), None),
        ])),
        ..TerraformConfig::default()
      }),
      ..settings()
    };
    let mut builder = builder(settings);

    let written = builder.package(&output, &Overrides::default()).await.unwrap();

    assert_eq!(written[0], output.join("opex.tf"));
    for file in ["opex.tf", "main.tf", "variables.tf", "env/dev/backend.tfvars", "env/dev/terraform.tfvars"] {
      let content = std::fs::read_to_string(output.join(file)).unwrap();
      assert!(!content.is_empty(), "{file} is empty");
    }
    assert!(!output.join("env/prod").exists());
  }
}
