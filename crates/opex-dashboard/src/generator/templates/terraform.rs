use crate::{
  error::Result,
  generator::{
    context::{Endpoint, TemplateContext},
    queries::{QueryContext, QueryMode, dialect_for},
  },
};

/// One `azurerm_monitor_scheduled_query_rules_alert` block.
struct Alarm<'a> {
  resource: String,
  suffix: &'static str,
  full_path: &'a str,
  description: String,
  query: String,
  frequency: u32,
  time_window: u32,
  occurrences: u32,
}

impl Alarm<'_> {
  fn render(&self, action_groups: &str, data_source_id: &str) -> String {
    format!(
      r#"resource "azurerm_monitor_scheduled_query_rules_alert" "{resource}" {{
  name                = replace(join("_",split("/", "${{local.name}}-{suffix} @ {full_path}")), "/\\{{|\\}}/", "")
  resource_group_name = data.azurerm_resource_group.this.name
  location            = data.azurerm_resource_group.this.location

  action {{
    action_group = {action_groups}
  }}

  data_source_id          = "{data_source_id}"
  description             = "{description} - ${{local.dashboard_base_addr}}${{azurerm_portal_dashboard.this.id}}"
  enabled                 = true
  auto_mitigation_enabled = false

  query = <<-QUERY

    
{query}

  QUERY

  severity    = 1
  frequency   = {frequency}
  time_window = {time_window}
  trigger {{
    operator  = "GreaterThanOrEqual"
    threshold = {occurrences}
  }}

  tags = var.tags
}}
"#,
      resource = self.resource,
      suffix = self.suffix,
      full_path = self.full_path,
      description = self.description,
      query = self.query,
      frequency = self.frequency,
      time_window = self.time_window,
      occurrences = self.occurrences,
    )
  }
}

fn percent(threshold: f64) -> f64 {
  (threshold * 10_000.0).round() / 100.0
}

fn endpoint_alarms(ctx: &TemplateContext, index: usize, key: &str, endpoint: &Endpoint) -> String {
  let dialect = dialect_for(ctx.resource_type);
  let query = QueryContext::new(ctx, key, endpoint, QueryMode::Alarm);
  let full_path = format!("{}{key}", ctx.base_path());
  let action_groups = serde_json::to_string(&ctx.action_groups_ids)
    .unwrap_or_default()
    .replace(',', ", ");

  let availability = Alarm {
    resource: format!("alarm_availability_{index}"),
    suffix: "availability",
    full_path: &full_path,
    description: format!(
      "Availability for {full_path} is less than or equal to {}%",
      percent(query.availability_threshold())
    ),
    query: dialect.availability(&query),
    frequency: endpoint
      .availability_evaluation_frequency
      .unwrap_or(ctx.evaluation_frequency),
    time_window: endpoint
      .availability_evaluation_time_window
      .unwrap_or(ctx.evaluation_time_window),
    occurrences: endpoint
      .availability_event_occurrences
      .unwrap_or(ctx.event_occurrences),
  };

  let response_time = Alarm {
    resource: format!("alarm_time_{index}"),
    suffix: "responsetime",
    full_path: &full_path,
    description: format!(
      "Response time for {full_path} is less than or equal to {}s",
      query.response_time_threshold()
    ),
    query: dialect.response_time(&query),
    frequency: endpoint
      .response_time_evaluation_frequency
      .unwrap_or(ctx.evaluation_frequency),
    time_window: endpoint
      .response_time_evaluation_time_window
      .unwrap_or(ctx.evaluation_time_window),
    occurrences: endpoint
      .response_time_event_occurrences
      .unwrap_or(ctx.event_occurrences),
  };

  format!(
    "{}\n{}",
    availability.render(&action_groups, &ctx.data_source_id),
    response_time.render(&action_groups, &ctx.data_source_id)
  )
}

/// Renders `opex.tf`: the portal dashboard embedding `dashboard_properties`
/// and two scheduled query alerts per endpoint.
pub fn render_terraform(ctx: &TemplateContext) -> Result<String> {
  let mut module = format!(
    r#"
locals {{
  name                = "${{var.prefix}}-${{var.env_short}}-{name}"
  dashboard_base_addr = "https://portal.azure.com/#@pagopait.onmicrosoft.com/dashboard/arm"
}}

data "azurerm_resource_group" "this" {{
  name     = "dashboards"
}}

resource "azurerm_portal_dashboard" "this" {{
  name                = local.name
  resource_group_name = data.azurerm_resource_group.this.name
  location            = data.azurerm_resource_group.this.location

  dashboard_properties = <<-PROPS
    {properties}
  PROPS

  tags = var.tags
}}


"#,
    name = ctx.name,
    properties = ctx.dashboard_properties.as_deref().unwrap_or_default(),
  );

  let alarms = ctx
    .endpoints
    .iter()
    .enumerate()
    .map(|(index, (key, endpoint))| endpoint_alarms(ctx, index, key, endpoint))
    .collect::<Vec<_>>();
  module.push_str(&alarms.join("\n"));
  module.push('\n');

  Ok(module)
}

#[cfg(test)]
mod tests {
  use indexmap::IndexMap;
  use pretty_assertions::assert_eq;

  use super::*;

  fn context() -> TemplateContext {
    TemplateContext {
      name: "PROD-IO".to_string(),
      action_groups_ids: vec!["/ag/one".to_string(), "/ag/two".to_string()],
      data_source_id: "/subscriptions/uuid/agw".to_string(),
      dashboard_properties: Some("{\"lenses\": {}}".to_string()),
      hosts: vec!["api.example.com".to_string()],
      endpoints: IndexMap::from([(
        "/users/{id}".to_string(),
        Endpoint {
          availability_threshold: Some(0.95),
          availability_evaluation_frequency: Some(5),
          ..Endpoint::default()
        },
      )]),
      evaluation_frequency: 10,
      evaluation_time_window: 20,
      event_occurrences: 1,
      timespan: "5m".to_string(),
      ..TemplateContext::default()
    }
  }

  #[test]
  fn test_module_header() {
    let module = render_terraform(&context()).unwrap();

    assert!(module.starts_with("\nlocals {\n  name                = \"${var.prefix}-${var.env_short}-PROD-IO\"\n"));
    assert!(module.contains("  dashboard_properties = <<-PROPS\n    {\"lenses\": {}}\n  PROPS\n"));
    assert!(module.ends_with("  tags = var.tags\n}\n\n"));
  }

  #[test]
  fn test_availability_alarm() {
    let module = render_terraform(&context()).unwrap();

    assert!(module.contains(r#"resource "azurerm_monitor_scheduled_query_rules_alert" "alarm_availability_0" {"#));
    assert!(module.contains(
      r#"  name                = replace(join("_",split("/", "${local.name}-availability @ /users/{id}")), "/\\{|\\}/", "")"#
    ));
    assert!(module.contains(r#"    action_group = ["/ag/one", "/ag/two"]"#));
    assert!(module.contains(r#"  data_source_id          = "/subscriptions/uuid/agw""#));
    assert!(module.contains(
      "  description             = \"Availability for /users/{id} is less than or equal to 95% - ${local.dashboard_base_addr}${azurerm_portal_dashboard.this.id}\"",
    ));
    assert!(module.contains("  query = <<-QUERY\n\n    \nlet api_hosts = datatable (name: string) [\"api.example.com\"];\nlet threshold = 0.95;\n"));
    assert!(module.contains("  frequency   = 5\n  time_window = 20\n"));
  }

  #[test]
  fn test_response_time_alarm_uses_context_cadence() {
    let module = render_terraform(&context()).unwrap();
    let alarm = module
      .split("resource \"azurerm_monitor_scheduled_query_rules_alert\" \"alarm_time_0\"")
      .nth(1)
      .unwrap();

    assert!(alarm.contains("-responsetime @ /users/{id}"));
    assert!(alarm.contains("Response time for /users/{id} is less than or equal to 1s"));
    assert!(alarm.contains("| where duration_percentile_95 > threshold\n\n\n  QUERY\n"));
    assert_eq!(
      alarm.split("  severity    = 1\n").nth(1).unwrap().lines().take(3).collect::<Vec<_>>(),
      vec!["  frequency   = 10", "  time_window = 20", "  trigger {"]
    );
  }

  #[test]
  fn test_base_path_prefixes_alarm_names() {
    let mut ctx = context();
    ctx.base_path = Some("/api".to_string());
    let module = render_terraform(&ctx).unwrap();

    assert!(module.contains("-availability @ /api/users/{id}"));
    assert!(module.contains("matches regex \"/api/users/[^/]+$\""));
  }

  #[test]
  fn test_threshold_percent() {
    assert_eq!(percent(0.99), 99.0);
    assert_eq!(percent(0.9), 90.0);
    assert_eq!(percent(1.0), 100.0);
  }
}
