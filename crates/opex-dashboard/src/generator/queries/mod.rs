//! Kusto query text for the dashboard parts and the scheduled alarms.

mod api_management;
mod app_gateway;

pub use api_management::ApiManagement;
pub use app_gateway::AppGateway;

use itertools::Itertools;

use super::context::{
  DEFAULT_AVAILABILITY_THRESHOLD, DEFAULT_RESPONSE_TIME_THRESHOLD, Endpoint, ResourceType, TemplateContext,
};
use crate::utils::uri_to_regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
  /// Keeps only the buckets breaching the threshold.
  Alarm,
  /// Renders the full series for a dashboard part.
  Display,
}

/// One endpoint seen through the render context.
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
  pub ctx: &'a TemplateContext,
  pub key: &'a str,
  pub endpoint: &'a Endpoint,
  pub mode: QueryMode,
}

impl<'a> QueryContext<'a> {
  pub fn new(ctx: &'a TemplateContext, key: &'a str, endpoint: &'a Endpoint, mode: QueryMode) -> Self {
    Self {
      ctx,
      key,
      endpoint,
      mode,
    }
  }

  /// Regex matched against the request path: base path plus the endpoint path, or its key.
  #[must_use]
  pub fn uri_pattern(&self) -> String {
    let path = self.endpoint.path.as_deref().unwrap_or(self.key);
    uri_to_regex(&format!("{}{path}", self.ctx.base_path()))
  }

  #[must_use]
  pub fn method(&self) -> Option<&'a str> {
    self.endpoint.method.as_deref()
  }

  #[must_use]
  pub fn availability_threshold(&self) -> f64 {
    self
      .endpoint
      .availability_threshold
      .or(self.ctx.availability_threshold)
      .unwrap_or(DEFAULT_AVAILABILITY_THRESHOLD)
  }

  #[must_use]
  pub fn response_time_threshold(&self) -> f64 {
    self
      .endpoint
      .response_time_threshold
      .or(self.ctx.response_time_threshold)
      .unwrap_or(DEFAULT_RESPONSE_TIME_THRESHOLD)
  }

  /// Leading newline in display mode; alarm queries start on the first line.
  fn lead(&self) -> &'static str {
    match self.mode {
      QueryMode::Alarm => "",
      QueryMode::Display => "\n",
    }
  }

  fn method_filter(&self, column: &str) -> String {
    self
      .method()
      .map(|method| format!("\n| where {column} == \"{method}\""))
      .unwrap_or_default()
  }
}

/// Log schema of the monitored resource.
pub trait QueryDialect: Sync {
  fn availability(&self, query: &QueryContext<'_>) -> String;
  fn response_time(&self, query: &QueryContext<'_>) -> String;
  fn response_codes(&self, query: &QueryContext<'_>) -> String;
}

#[must_use]
pub fn dialect_for(resource_type: ResourceType) -> &'static dyn QueryDialect {
  match resource_type {
    ResourceType::AppGateway => &AppGateway,
    ResourceType::ApiManagement => &ApiManagement,
  }
}

/// Renders the `case(...)` arms bucketing `column` into status categories.
///
/// Every category but the last becomes a `between` arm over the codes it
/// covers (`2XX` covers 200..299, `404` only itself); the last one is the fallback.
/// Configured categories are checked against that shape when the config loads.
fn status_case(column: &str, categories: &[String]) -> String {
  let Some((fallback, arms)) = categories.split_last() else {
    return "  \"\")".to_string();
  };

  let mut case = String::new();
  for category in arms {
    let prefix = category.trim_end_matches(['X', 'x']);
    let width = category.len();
    let low = format!("{prefix:0<width$}");
    let high = format!("{prefix:9<width$}");
    case.push_str(&format!("  {column} between ({low} .. {high}), \"{category}\",\n"));
  }
  case.push_str(&format!("  \"{fallback}\")"));
  case
}

fn hosts_datatable(hosts: &[String]) -> String {
  format!("[{}]", hosts.iter().map(|host| format!("\"{host}\"")).join(", "))
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_status_case_default_categories() {
    let categories = ["1XX", "2XX", "3XX", "4XX", "5XX"].map(String::from);
    assert_eq!(
      status_case("httpStatus_d", &categories),
      concat!(
        "  httpStatus_d between (100 .. 199), \"1XX\",\n",
        "  httpStatus_d between (200 .. 299), \"2XX\",\n",
        "  httpStatus_d between (300 .. 399), \"3XX\",\n",
        "  httpStatus_d between (400 .. 499), \"4XX\",\n",
        "  \"5XX\")",
      )
    );
  }

  #[test]
  fn test_status_case_custom_categories() {
    let categories = ["2XX", "404", "other"].map(String::from);
    assert_eq!(
      status_case("responseCode_d", &categories),
      concat!(
        "  responseCode_d between (200 .. 299), \"2XX\",\n",
        "  responseCode_d between (404 .. 404), \"404\",\n",
        "  \"other\")",
      )
    );
  }

  #[test]
  fn test_hosts_datatable() {
    let hosts = vec!["a.example.com".to_string(), "b.example.com".to_string()];
    assert_eq!(hosts_datatable(&hosts), r#"["a.example.com", "b.example.com"]"#);
    assert_eq!(hosts_datatable(&[]), "[]");
    assert_eq!(hosts_datatable(&["api.example.com:8443".to_string()]), r#"["api.example.com:8443"]"#);
  }

  #[test]
  fn test_thresholds_fall_back_to_context_then_defaults() {
    let ctx = TemplateContext {
      response_time_threshold: Some(2.5),
      ..TemplateContext::default()
    };
    let endpoint = Endpoint {
      availability_threshold: Some(0.9),
      ..Endpoint::default()
    };
    let query = QueryContext::new(&ctx, "/users", &endpoint, QueryMode::Display);
    assert_eq!(query.availability_threshold(), 0.9);
    assert_eq!(query.response_time_threshold(), 2.5);

    let empty = TemplateContext::default();
    let bare = Endpoint::default();
    let query = QueryContext::new(&empty, "/users", &bare, QueryMode::Alarm);
    assert_eq!(query.availability_threshold(), 0.99);
    assert_eq!(query.response_time_threshold(), 1.0);
  }

  #[test]
  fn test_uri_pattern_uses_base_path_and_explicit_path() {
    let ctx = TemplateContext {
      base_path: Some("/api".to_string()),
      ..TemplateContext::default()
    };
    let endpoint = Endpoint {
      path: Some("/users/{id}".to_string()),
      ..Endpoint::default()
    };
    let query = QueryContext::new(&ctx, "/ignored", &endpoint, QueryMode::Display);
    assert_eq!(query.uri_pattern(), "/api/users/[^/]+$");

    let bare = Endpoint::default();
    let query = QueryContext::new(&ctx, "/health", &bare, QueryMode::Display);
    assert_eq!(query.uri_pattern(), "/api/health$");
  }
}
