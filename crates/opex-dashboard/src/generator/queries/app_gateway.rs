use super::{QueryContext, QueryDialect, QueryMode, hosts_datatable, status_case};

/// Application Gateway access logs in `AzureDiagnostics`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppGateway;

impl QueryDialect for AppGateway {
  fn availability(&self, query: &QueryContext<'_>) -> String {
    let outcome = match query.mode {
      QueryMode::Alarm => "| where availability < threshold",
      QueryMode::Display => {
        "| project TimeGenerated, availability, watermark=threshold
| render timechart with (xtitle = \"time\", ytitle= \"availability(%)\")"
      }
    };

    format!(
      "{lead}let api_hosts = datatable (name: string) {hosts};
let threshold = {threshold};
AzureDiagnostics
| where originalHost_s in (api_hosts)
| where requestUri_s matches regex \"{pattern}\"{method}
| summarize
  Total=count(),
  Success=count(httpStatus_d < 500) by bin(TimeGenerated, {timespan})
| extend availability=toreal(Success) / Total
{outcome}
",
      lead = query.lead(),
      hosts = hosts_datatable(&query.ctx.hosts),
      threshold = query.availability_threshold(),
      pattern = query.uri_pattern(),
      method = query.method_filter("httpMethod_s"),
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
      "{lead}let api_hosts = datatable (name: string) {hosts};
let threshold = {threshold};
AzureDiagnostics
| where originalHost_s in (api_hosts)
| where requestUri_s matches regex \"{pattern}\"{method}
| summarize
    watermark=threshold,
    duration_percentile_{percentile}=percentiles(timeTaken_d, {percentile}) by bin(TimeGenerated, {timespan})
{outcome}
",
      lead = query.lead(),
      hosts = hosts_datatable(&query.ctx.hosts),
      threshold = query.response_time_threshold(),
      pattern = query.uri_pattern(),
      method = query.method_filter("httpMethod_s"),
      timespan = query.ctx.timespan(),
    )
  }

  fn response_codes(&self, query: &QueryContext<'_>) -> String {
    format!(
      "\nlet api_url = \"{pattern}\";
let api_hosts = datatable (name: string) {hosts};
AzureDiagnostics
| where originalHost_s in (api_hosts)
| where requestUri_s matches regex api_url{method}
| extend HTTPStatus = case(
{case}
| summarize count() by HTTPStatus, bin(TimeGenerated, {timespan})
| render areachart with (xtitle = \"time\", ytitle= \"count\")
",
      pattern = query.uri_pattern(),
      hosts = hosts_datatable(&query.ctx.hosts),
      method = query.method_filter("httpMethod_s"),
      case = status_case("httpStatus_d", &query.ctx.status_code_categories()),
      timespan = query.ctx.timespan(),
    )
  }
}
