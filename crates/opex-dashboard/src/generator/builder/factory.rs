use strum::{Display, EnumIter, EnumString};

use super::{Builder, RawDashboardBuilder, TerraformDashboardBuilder};
use crate::{
  config::TerraformConfig,
  error::{Error, Result},
  generator::context::{DEFAULT_TIMESPAN, EvaluationDefaults, QueryConfig, ResourceType},
  spec::SpecResolver,
};

/// Template types accepted by `generate --template-type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum BuilderType {
  AzureDashboard,
  AzureDashboardRaw,
}

impl BuilderType {
  pub fn parse(name: &str) -> Result<Self> {
    name
      .parse()
      .map_err(|_| Error::InvalidBuilder(format!("Invalid builder error: unknown builder {name}")))
  }
}

/// Everything a builder needs besides the spec itself.
#[derive(Debug, Clone, bon::Builder)]
pub struct DashboardSettings {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub location: String,
  #[builder(into)]
  pub data_source_id: String,
  #[builder(default)]
  pub action_groups_ids: Vec<String>,
  #[builder(default)]
  pub resource_type: ResourceType,
  #[builder(into, default = DEFAULT_TIMESPAN.to_string())]
  pub timespan: String,
  #[builder(default)]
  pub evaluation: EvaluationDefaults,
  pub availability_threshold: Option<f64>,
  pub response_time_threshold: Option<f64>,
  pub queries: Option<QueryConfig>,
  pub terraform: Option<TerraformConfig>,
}

/// Resolves the spec and builds the requested builder around it.
///
/// # Errors
///
/// Resolver errors (`Error::Parse` for a missing, unreadable or malformed
/// spec) are returned as they are, not wrapped.
/// Only a builder that cannot be constructed from the resolved document is
/// reported as `Error::InvalidBuilder`.
pub async fn create_builder(
  kind: BuilderType,
  settings: DashboardSettings,
  resolver: &SpecResolver,
) -> Result<Box<dyn Builder>> {
  let spec = resolver.resolve().await?;
  let raw = RawDashboardBuilder::new(spec, &settings)
    .map_err(|e| Error::InvalidBuilder(format!("Failed to create builder: {e}")))?;

  Ok(match kind {
    BuilderType::AzureDashboardRaw => Box::new(raw),
    BuilderType::AzureDashboard => Box::new(TerraformDashboardBuilder::new(raw, settings)),
  })
}
