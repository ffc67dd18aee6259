//! YAML configuration of a dashboard.

mod defaults;
mod loader;

use indexmap::IndexMap;
use serde::Deserialize;
use validator::Validate;

pub use loader::{load_config, parse_config};

use crate::generator::{
  DashboardSettings, EvaluationDefaults, Overrides, QueryConfig, ResourceType,
};

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct Config {
  /// Spec location: file path, `-` for stdin, or an HTTP(S) URL.
  pub oa3_spec: String,
  pub name: String,
  pub location: String,
  /// Resource id of the monitored Application Gateway or API Management instance.
  pub data_source: String,
  pub action_groups: Vec<String>,
  #[serde(default)]
  pub resource_type: ResourceType,
  #[serde(default = "defaults::timespan")]
  pub timespan: String,
  #[validate(range(min = 0.0, max = 1.0))]
  pub availability_threshold: Option<f64>,
  #[validate(range(min = 0.0))]
  pub response_time_threshold: Option<f64>,
  #[serde(default = "defaults::evaluation_frequency")]
  #[validate(range(min = 1))]
  pub evaluation_frequency: u32,
  #[serde(default = "defaults::evaluation_time_window")]
  #[validate(range(min = 1))]
  pub evaluation_time_window: u32,
  #[serde(default = "defaults::event_occurrences")]
  #[validate(range(min = 1))]
  pub event_occurrences: u32,
  #[validate(nested)]
  pub queries: Option<QueryConfig>,
  pub overrides: Option<Overrides>,
  #[validate(nested)]
  pub terraform: Option<TerraformConfig>,
}

impl Config {
  pub fn evaluation(&self) -> EvaluationDefaults {
    EvaluationDefaults {
      frequency: self.evaluation_frequency,
      time_window: self.evaluation_time_window,
      event_occurrences: self.event_occurrences,
    }
  }

  /// Top-level query options, else the ones under `overrides`.
  pub fn queries(&self) -> Option<QueryConfig> {
    self
      .queries
      .clone()
      .or_else(|| self.overrides.as_ref().and_then(|overrides| overrides.queries.clone()))
  }

  pub fn overrides(&self) -> Overrides {
    self.overrides.clone().unwrap_or_default()
  }

  pub fn settings(&self) -> DashboardSettings {
    DashboardSettings::builder()
      .name(self.name.clone())
      .location(self.location.clone())
      .data_source_id(self.data_source.clone())
      .action_groups_ids(self.action_groups.clone())
      .resource_type(self.resource_type)
      .timespan(self.timespan.clone())
      .evaluation(self.evaluation())
      .maybe_availability_threshold(self.availability_threshold)
      .maybe_response_time_threshold(self.response_time_threshold)
      .maybe_queries(self.queries())
      .maybe_terraform(self.terraform.clone())
      .build()
  }
}

/// Deployment settings of the packaged Terraform module.
///
/// `prefix`, `env_short` and `backend` describe a single deployment whose
/// tfvars land at the package root; `environments` adds one `env/<name>`
/// directory per entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct TerraformConfig {
  pub environments: Option<IndexMap<String, Option<EnvironmentConfig>>>,
  #[validate(length(max = 6))]
  pub prefix: Option<String>,
  #[validate(length(max = 1))]
  pub env_short: Option<String>,
  pub backend: Option<BackendConfig>,
}

impl TerraformConfig {
  #[must_use]
  pub fn is_flat(&self) -> bool {
    self.prefix.is_some()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct EnvironmentConfig {
  #[validate(length(max = 6))]
  pub prefix: Option<String>,
  #[validate(length(max = 1))]
  pub env_short: Option<String>,
  pub backend: Option<BackendConfig>,
}

impl EnvironmentConfig {
  /// True for an entry that sets nothing, such as `dev: {}`.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.prefix.is_none() && self.env_short.is_none() && self.backend.is_none()
  }
}

/// azurerm backend of the Terraform state.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BackendConfig {
  pub resource_group_name: Option<String>,
  pub storage_account_name: Option<String>,
  pub container_name: Option<String>,
  pub key: Option<String>,
}
