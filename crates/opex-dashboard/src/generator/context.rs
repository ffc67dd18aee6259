use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::{Validate, ValidationError};

pub const DEFAULT_AVAILABILITY_THRESHOLD: f64 = 0.99;
pub const DEFAULT_RESPONSE_TIME_THRESHOLD: f64 = 1.0;
pub const DEFAULT_RESPONSE_TIME_PERCENTILE: u8 = 95;
pub const DEFAULT_TIMESPAN: &str = "5m";
pub const DEFAULT_STATUS_CODE_CATEGORIES: [&str; 5] = ["1XX", "2XX", "3XX", "4XX", "5XX"];

static STATUS_CATEGORY_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[1-5]([0-9]{2}|[0-9][Xx]|[Xx]{2})$").unwrap());

/// Azure resource whose diagnostics feed the dashboard queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ResourceType {
  #[default]
  AppGateway,
  ApiManagement,
}

/// Alerting cadence applied to every extracted endpoint unless overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationDefaults {
  pub frequency: u32,
  pub time_window: u32,
  pub event_occurrences: u32,
}

impl Default for EvaluationDefaults {
  fn default() -> Self {
    Self {
      frequency: 10,
      time_window: 20,
      event_occurrences: 1,
    }
  }
}

/// Per-endpoint monitoring properties.
///
/// Every field is optional so the same type carries both extracted endpoints
/// and partial overrides. Keys serialize in camelCase; the snake_case spelling
/// used by configuration files is accepted on input.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
  pub method: Option<String>,
  pub path: Option<String>,
  #[serde(alias = "availability_threshold")]
  #[validate(range(min = 0.0, max = 1.0))]
  pub availability_threshold: Option<f64>,
  #[serde(alias = "availability_evaluation_frequency")]
  #[validate(range(min = 1))]
  pub availability_evaluation_frequency: Option<u32>,
  #[serde(alias = "availability_evaluation_time_window")]
  #[validate(range(min = 1))]
  pub availability_evaluation_time_window: Option<u32>,
  #[serde(alias = "availability_event_occurrences")]
  #[validate(range(min = 1))]
  pub availability_event_occurrences: Option<u32>,
  #[serde(alias = "response_time_threshold")]
  #[validate(range(min = 0.0))]
  pub response_time_threshold: Option<f64>,
  #[serde(alias = "response_time_evaluation_frequency")]
  #[validate(range(min = 1))]
  pub response_time_evaluation_frequency: Option<u32>,
  #[serde(alias = "response_time_evaluation_time_window")]
  #[validate(range(min = 1))]
  pub response_time_evaluation_time_window: Option<u32>,
  #[serde(alias = "response_time_event_occurrences")]
  #[validate(range(min = 1))]
  pub response_time_event_occurrences: Option<u32>,
}

impl Endpoint {
  pub(crate) fn with_defaults(
    evaluation: &EvaluationDefaults,
    availability_threshold: Option<f64>,
    response_time_threshold: Option<f64>,
  ) -> Self {
    Self {
      method: None,
      path: None,
      availability_threshold,
      availability_evaluation_frequency: Some(evaluation.frequency),
      availability_evaluation_time_window: Some(evaluation.time_window),
      availability_event_occurrences: Some(evaluation.event_occurrences),
      response_time_threshold,
      response_time_evaluation_frequency: Some(evaluation.frequency),
      response_time_evaluation_time_window: Some(evaluation.time_window),
      response_time_event_occurrences: Some(evaluation.event_occurrences),
    }
  }
}

/// Query shaping options shared by every dashboard part.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfig {
  #[serde(alias = "response_time_percentile")]
  #[validate(range(min = 1, max = 99))]
  pub response_time_percentile: Option<u8>,
  #[serde(alias = "status_code_categories")]
  #[validate(length(min = 1), custom(function = "validate_status_categories"))]
  pub status_code_categories: Option<Vec<String>>,
}

/// Every category but the last must be a status code or an `NXX`/`NNX`
/// range; the last one labels whatever the others leave unmatched. All of
/// them end up inside KQL string literals, so quotes and backslashes are
/// rejected outright.
fn validate_status_categories(categories: &[String]) -> Result<(), ValidationError> {
  let invalid = |category: &str, reason: &str| {
    ValidationError::new("status_code_category").with_message(format!("`{category}` {reason}").into())
  };

  if let Some(category) = categories.iter().find(|c| c.contains(['"', '\\'])) {
    return Err(invalid(category, "must not contain quotes or backslashes"));
  }
  if let Some((_, ranges)) = categories.split_last()
    && let Some(category) = ranges.iter().find(|c| !STATUS_CATEGORY_RE.is_match(c))
  {
    return Err(invalid(category, "is not a status code or range such as 404 or 5XX"));
  }
  Ok(())
}

impl QueryConfig {
  #[must_use]
  pub fn percentile(&self) -> u8 {
    self.response_time_percentile.unwrap_or(DEFAULT_RESPONSE_TIME_PERCENTILE)
  }

  #[must_use]
  pub fn categories(&self) -> Vec<String> {
    self.status_code_categories.clone().unwrap_or_else(|| {
      DEFAULT_STATUS_CODE_CATEGORIES
        .iter()
        .map(ToString::to_string)
        .collect()
    })
  }
}

/// Render-time model handed to the dashboard and Terraform templates.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContext {
  pub action_groups_ids: Vec<String>,
  pub availability_threshold: Option<f64>,
  pub base_path: Option<String>,
  pub dashboard_properties: Option<String>,
  pub data_source_id: String,
  pub endpoints: IndexMap<String, Endpoint>,
  pub evaluation_frequency: u32,
  pub evaluation_time_window: u32,
  pub event_occurrences: u32,
  pub hosts: Vec<String>,
  pub location: String,
  pub name: String,
  pub queries: Option<QueryConfig>,
  pub resource_type: ResourceType,
  pub response_time_threshold: Option<f64>,
  pub timespan: String,
}

impl TemplateContext {
  #[must_use]
  pub fn timespan(&self) -> &str {
    if self.timespan.is_empty() {
      DEFAULT_TIMESPAN
    } else {
      &self.timespan
    }
  }

  #[must_use]
  pub fn base_path(&self) -> &str {
    self.base_path.as_deref().unwrap_or_default()
  }

  #[must_use]
  pub fn percentile(&self) -> u8 {
    self
      .queries
      .as_ref()
      .map_or(DEFAULT_RESPONSE_TIME_PERCENTILE, QueryConfig::percentile)
  }

  #[must_use]
  pub fn status_code_categories(&self) -> Vec<String> {
    self.queries.clone().unwrap_or_default().categories()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_accepts_both_spellings() {
    let snake: Endpoint = serde_json::from_str(r#"{"availability_threshold": 0.95, "method": "GET"}"#).unwrap();
    let camel: Endpoint = serde_json::from_str(r#"{"availabilityThreshold": 0.95, "method": "GET"}"#).unwrap();
    assert_eq!(snake, camel);
    assert_eq!(snake.availability_threshold, Some(0.95));
  }

  #[test]
  fn test_endpoint_skips_unset_fields() {
    let endpoint = Endpoint {
      response_time_threshold: Some(2.0),
      ..Endpoint::default()
    };
    assert_eq!(
      serde_json::to_value(&endpoint).unwrap(),
      serde_json::json!({"responseTimeThreshold": 2.0})
    );
  }

  #[test]
  fn test_query_config_defaults() {
    let queries = QueryConfig::default();
    assert_eq!(queries.percentile(), 95);
    assert_eq!(queries.categories(), vec!["1XX", "2XX", "3XX", "4XX", "5XX"]);
  }

  #[test]
  fn test_status_categories_validation() {
    let config = |categories: &[&str]| QueryConfig {
      status_code_categories: Some(categories.iter().map(ToString::to_string).collect()),
      ..QueryConfig::default()
    };

    assert!(config(&["2XX", "404", "50x", "other"]).validate().is_ok());
    assert!(config(&["other"]).validate().is_ok());
    assert!(config(&["other", "5XX"]).validate().is_err());
    assert!(config(&["6XX", "other"]).validate().is_err());
    assert!(config(&["2X", "other"]).validate().is_err());
    assert!(config(&["2XX", "say \"hi\""]).validate().is_err());
  }

  #[test]
  fn test_resource_type_parsing() {
    assert_eq!("api-management".parse::<ResourceType>().unwrap(), ResourceType::ApiManagement);
    assert_eq!(ResourceType::AppGateway.to_string(), "app-gateway");
    assert!("load-balancer".parse::<ResourceType>().is_err());
  }

  #[test]
  fn test_context_fallbacks() {
    let ctx = TemplateContext::default();
    assert_eq!(ctx.timespan(), "5m");
    assert_eq!(ctx.base_path(), "");
    assert_eq!(ctx.percentile(), 95);
  }
}
