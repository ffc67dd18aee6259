use super::{QueryContext, QueryDialect, QueryMode, status_case};

/// API Management gateway logs in `AzureDiagnostics`.
///
/// The gateway reports one host per instance, so queries filter on the URL only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiManagement;

impl QueryDialect for ApiManagement {
  fn availability(&self, query: &QueryContext<'_>) -> String {
    let outcome = match query.mode {
      QueryMode::Alarm => "| where availability < threshold",
      QueryMode::Display => {
        "| project TimeGenerated, availability, watermark=threshold
| render timechart with (xtitle = \"time\", ytitle= \"availability(%)\")"
      }
    };

    format!(
      "{lead}let threshold = {threshold};
AzureDiagnostics
| where url_s matches regex \"{pattern}\"{method}
| summarize
  Total=count(),
  Success=count(responseCode_d < 500 and responseCode_d != 0) by bin(TimeGenerated, {timespan})
| extend availability=toreal(Success) / Total
{outcome}
",
      lead = query.lead(),
      threshold = query.availability_threshold(),
      pattern = query.uri_pattern(),
      method = query.method_filter("method_s"),
      timespan = query.ctx.timespan(),
    )
  }

  fn response_time(&self, query: &QueryContext<'_>) -> String {
    let percentile = query.ctx.percentile();
    let outcome = match query.mode {
      QueryMode::Alarm => format!("| where duration_percentile_{percentile} > threshold"),
      QueryMode::Display => "| render timechart with (xtitle = \"time\", ytitle= \"response time(s)\")".to_string(),
    };

    format!(
      "{lead}let threshold = {threshold};
AzureDiagnostics
| where url_s matches regex \"{pattern}\"{method}
| summarize
    watermark=threshold,
    duration_percentile_{percentile}=percentiles(todouble(DurationMs)/1000, {percentile}) by bin(TimeGenerated, {timespan})
{outcome}
",
      lead = query.lead(),
      threshold = query.response_time_threshold(),
      pattern = query.uri_pattern(),
      method = query.method_filter("method_s"),
      timespan = query.ctx.timespan(),
    )
  }

  fn response_codes(&self, query: &QueryContext<'_>) -> String {
    format!(
      "\nlet api_url = \"{pattern}\";
AzureDiagnostics
| where url_s matches regex api_url{method}
| extend HTTPStatus = case(
{case}
| summarize count() by HTTPStatus, bin(TimeGenerated, {timespan})
| render areachart with (xtitle = \"time\", ytitle= \"count\")
",
      pattern = query.uri_pattern(),
      method = query.method_filter("method_s"),
      case = status_case("responseCode_d", &query.ctx.status_code_categories()),
      timespan = query.ctx.timespan(),
    )
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::generator::context::{Endpoint, TemplateContext};

  #[test]
  fn test_availability_alarm() {
    let ctx = TemplateContext {
      hosts: vec!["ignored.example.com".to_string()],
      timespan: "10m".to_string(),
      ..TemplateContext::default()
    };
    let endpoint = Endpoint {
      method: Some("POST".to_string()),
      ..Endpoint::default()
    };
    let query = QueryContext::new(&ctx, "/orders", &endpoint, QueryMode::Alarm);

    assert_eq!(
      ApiManagement.availability(&query),
      r#"let threshold = 0.99;
AzureDiagnostics
| where url_s matches regex "/orders$"
| where method_s == "POST"
| summarize
  Total=count(),
  Success=count(responseCode_d < 500 and responseCode_d != 0) by bin(TimeGenerated, 10m)
| extend availability=toreal(Success) / Total
| where availability < threshold
"#
    );
  }

  #[test]
  fn test_response_time_display() {
    let ctx = TemplateContext {
      timespan: "5m".to_string(),
      ..TemplateContext::default()
    };
    let endpoint = Endpoint {
      response_time_threshold: Some(0.5),
      ..Endpoint::default()
    };
    let query = QueryContext::new(&ctx, "/orders/{id}", &endpoint, QueryMode::Display);

    assert_eq!(
      ApiManagement.response_time(&query),
      r#"
let threshold = 0.5;
AzureDiagnostics
| where url_s matches regex "/orders/[^/]+$"
| summarize
    watermark=threshold,
    duration_percentile_95=percentiles(todouble(DurationMs)/1000, 95) by bin(TimeGenerated, 5m)
| render timechart with (xtitle = "time", ytitle= "response time(s)")
"#
    );
  }

  #[test]
  fn test_response_codes_has_no_host_filter() {
    let ctx = TemplateContext::default();
    let endpoint = Endpoint::default();
    let text = ApiManagement.response_codes(&QueryContext::new(&ctx, "/orders", &endpoint, QueryMode::Display));

    assert!(!text.contains("api_hosts"));
    assert!(text.contains("  responseCode_d between (400 .. 499), \"4XX\",\n  \"5XX\")\n"));
    assert!(text.contains("bin(TimeGenerated, 5m)"));
  }
}
