use serde_json::{Map, Value, json};

use crate::{
  error::{Error, Result},
  generator::{
    context::TemplateContext,
    queries::{QueryContext, QueryMode, dialect_for},
  },
};

const PART_TYPE: &str = "Extension/Microsoft_OperationsManagementSuite_Workspace/PartType/LogsDashboardPart";
const PART_COLUMNS: usize = 6;
const PART_ROWS: usize = 4;
const PARTS_PER_ENDPOINT: usize = 3;
const FILTERED_PART_BASE_ID: &str = "StartboardPart-LogsDashboardPart-9badbd78-7607-4131-8fa1-8b85191432";
const FILTERED_PART_COUNT: u32 = 9;
const FILTERED_PART_FIRST_SUFFIX: u32 = 0xed;

struct PartInputs<'a> {
  resource_ids: &'a Value,
  query: &'a str,
  title: &'a str,
  subtitle: &'a str,
  chart: &'a str,
  dimensions: Value,
}

impl PartInputs<'_> {
  fn into_value(self) -> Value {
    json!([
      {"name": "resourceTypeMode", "isOptional": true},
      {"name": "ComponentId", "isOptional": true},
      {"name": "Scope", "value": {"resourceIds": self.resource_ids}, "isOptional": true},
      {"name": "PartId", "isOptional": true},
      {"name": "Version", "value": "2.0", "isOptional": true},
      {"name": "TimeRange", "value": "PT4H", "isOptional": true},
      {"name": "DashboardId", "isOptional": true},
      {"name": "DraftRequestParameters", "value": {"scope": "hierarchy"}, "isOptional": true},
      {"name": "Query", "value": self.query, "isOptional": true},
      {"name": "ControlType", "value": "FrameControlChart", "isOptional": true},
      {"name": "SpecificChart", "value": self.chart, "isOptional": true},
      {"name": "PartTitle", "value": self.title, "isOptional": true},
      {"name": "PartSubTitle", "value": self.subtitle, "isOptional": true},
      {"name": "Dimensions", "value": self.dimensions, "isOptional": true},
      {"name": "LegendOptions", "value": {"isEnabled": true, "position": "Bottom"}, "isOptional": true},
      {"name": "IsQueryContainTimeRange", "value": false, "isOptional": true},
    ])
  }
}

fn position(column: usize, row: usize) -> Value {
  json!({"x": column * PART_COLUMNS, "y": row * PART_ROWS, "colSpan": PART_COLUMNS, "rowSpan": PART_ROWS})
}

fn filtered_part_ids() -> Vec<String> {
  (0..FILTERED_PART_COUNT)
    .map(|i| format!("{FILTERED_PART_BASE_ID}{:x}", FILTERED_PART_FIRST_SUFFIX + i * 2))
    .collect()
}

/// Renders the Azure Portal dashboard document: three log parts per endpoint,
/// one endpoint per row.
pub fn render_dashboard(ctx: &TemplateContext) -> Result<String> {
  let dialect = dialect_for(ctx.resource_type);
  let resource_ids = json!([ctx.data_source_id]);
  let timespan = ctx.timespan();
  let percentile_column = format!("duration_percentile_{}", ctx.percentile());

  let mut parts = Map::new();
  for (row, (key, endpoint)) in ctx.endpoints.iter().enumerate() {
    let full_path = format!("{}{key}", ctx.base_path());
    let query = QueryContext::new(ctx, key, endpoint, QueryMode::Display);
    let index = row * PARTS_PER_ENDPOINT;

    let availability_title = format!("Availability ({timespan})");
    let availability_query = dialect.availability(&query);
    parts.insert(
      index.to_string(),
      json!({
        "position": position(0, row),
        "metadata": {
          "inputs": PartInputs {
            resource_ids: &resource_ids,
            query: &availability_query,
            title: &availability_title,
            subtitle: &full_path,
            chart: "Line",
            dimensions: json!({
              "xAxis": {"name": "TimeGenerated", "type": "datetime"},
              "yAxis": [{"name": "availability", "type": "real"}, {"name": "watermark", "type": "real"}],
              "splitBy": [],
              "aggregation": "Sum",
            }),
          }.into_value(),
          "type": PART_TYPE,
          "settings": {
            "content": {
              "Query": availability_query,
              "PartTitle": availability_title,
            },
          },
        },
      }),
    );

    let codes_title = format!("Response Codes ({timespan})");
    let codes_query = dialect.response_codes(&query);
    parts.insert(
      (index + 1).to_string(),
      json!({
        "position": position(1, row),
        "metadata": {
          "inputs": PartInputs {
            resource_ids: &resource_ids,
            query: &codes_query,
            title: &codes_title,
            subtitle: &full_path,
            chart: "Pie",
            dimensions: json!({
              "xAxis": {"name": "httpStatus_d", "type": "string"},
              "yAxis": [{"name": "count_", "type": "long"}],
              "splitBy": [],
              "aggregation": "Sum",
            }),
          }.into_value(),
          "type": PART_TYPE,
          "settings": {
            "content": {
              "Query": codes_query,
              "SpecificChart": "StackedArea",
              "PartTitle": codes_title,
              "Dimensions": {
                "xAxis": {"name": "TimeGenerated", "type": "datetime"},
                "yAxis": [{"name": "count_", "type": "long"}],
                "splitBy": [{"name": "HTTPStatus", "type": "string"}],
                "aggregation": "Sum",
              },
            },
          },
        },
      }),
    );

    let time_title = format!("Percentile Response Time ({timespan})");
    let time_query = dialect.response_time(&query);
    parts.insert(
      (index + 2).to_string(),
      json!({
        "position": position(2, row),
        "metadata": {
          "inputs": PartInputs {
            resource_ids: &resource_ids,
            query: &time_query,
            title: &time_title,
            subtitle: &full_path,
            chart: "StackedColumn",
            dimensions: json!({
              "xAxis": {"name": "TimeGenerated", "type": "datetime"},
              "yAxis": [{"name": percentile_column, "type": "real"}],
              "splitBy": [],
              "aggregation": "Sum",
            }),
          }.into_value(),
          "type": PART_TYPE,
          "settings": {
            "content": {
              "Query": time_query,
              "SpecificChart": "Line",
              "PartTitle": time_title,
              "Dimensions": {
                "xAxis": {"name": "TimeGenerated", "type": "datetime"},
                "yAxis": [{"name": "watermark", "type": "long"}, {"name": percentile_column, "type": "real"}],
                "splitBy": [],
                "aggregation": "Sum",
              },
            },
          },
        },
      }),
    );
  }

  let dashboard = json!({
    "properties": {
      "lenses": {
        "0": {
          "order": 0,
          "parts": parts,
        },
      },
      "metadata": {
        "model": {
          "timeRange": {
            "value": {"relative": {"duration": 24, "timeUnit": 1}},
            "type": "MsPortalFx.Composition.Configuration.ValueTypes.TimeRange",
          },
          "filterLocale": {"value": "en-us"},
          "filters": {
            "value": {
              "MsPortalFx_TimeRange": {
                "model": {"format": "local", "granularity": "auto", "relative": "48h"},
                "displayCache": {"name": "Local Time", "value": "Past 48 hours"},
                "filteredPartIds": filtered_part_ids(),
              },
            },
          },
        },
      },
    },
    "name": ctx.name,
    "type": "Microsoft.Portal/dashboards",
    "location": ctx.location,
    "tags": {"hidden-title": ctx.name},
    "apiVersion": "2015-08-01-preview",
  });

  serde_json::to_string_pretty(&dashboard).map_err(|e| Error::config(format!("Unable to render dashboard: {e}")))
}

#[cfg(test)]
mod tests {
  use indexmap::IndexMap;
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::generator::context::{Endpoint, ResourceType};

  fn context() -> TemplateContext {
    TemplateContext {
      name: "PROD-IO".to_string(),
      location: "West Europe".to_string(),
      data_source_id: "/subscriptions/uuid/resourceGroups/rg/providers/Microsoft.Network/applicationGateways/agw"
        .to_string(),
      hosts: vec!["app.example.com".to_string()],
      endpoints: IndexMap::from([
        ("/health".to_string(), Endpoint::default()),
        (
          "/users/{id}".to_string(),
          Endpoint {
            method: Some("GET".to_string()),
            ..Endpoint::default()
          },
        ),
      ]),
      timespan: "5m".to_string(),
      resource_type: ResourceType::AppGateway,
      ..TemplateContext::default()
    }
  }

  fn input<'a>(part: &'a Value, name: &str) -> &'a Value {
    part["metadata"]["inputs"]
      .as_array()
      .unwrap()
      .iter()
      .find(|input| input["name"] == name)
      .unwrap()
  }

  #[test]
  fn test_document_envelope() {
    let dashboard: Value = serde_json::from_str(&render_dashboard(&context()).unwrap()).unwrap();

    assert_eq!(dashboard["name"], "PROD-IO");
    assert_eq!(dashboard["type"], "Microsoft.Portal/dashboards");
    assert_eq!(dashboard["location"], "West Europe");
    assert_eq!(dashboard["tags"]["hidden-title"], "PROD-IO");
    assert_eq!(dashboard["apiVersion"], "2015-08-01-preview");

    let ids = dashboard["properties"]["metadata"]["model"]["filters"]["value"]["MsPortalFx_TimeRange"]["filteredPartIds"]
      .as_array()
      .unwrap();
    assert_eq!(ids.len(), 9);
    assert_eq!(ids[0], "StartboardPart-LogsDashboardPart-9badbd78-7607-4131-8fa1-8b85191432ed");
    assert_eq!(ids[8], "StartboardPart-LogsDashboardPart-9badbd78-7607-4131-8fa1-8b85191432fd");
  }

  #[test]
  fn test_three_parts_per_endpoint() {
    let dashboard: Value = serde_json::from_str(&render_dashboard(&context()).unwrap()).unwrap();
    let parts = dashboard["properties"]["lenses"]["0"]["parts"].as_object().unwrap();

    assert_eq!(parts.keys().collect::<Vec<_>>(), vec!["0", "1", "2", "3", "4", "5"]);
    assert_eq!(parts["4"]["position"], json!({"x": 6, "y": 4, "colSpan": 6, "rowSpan": 4}));
    assert_eq!(parts["5"]["position"]["x"], 12);
    assert_eq!(input(&parts["3"], "PartSubTitle")["value"], "/users/{id}");
    assert_eq!(input(&parts["0"], "Scope")["value"]["resourceIds"][0], context().data_source_id);
    assert_eq!(parts["1"]["metadata"]["settings"]["content"]["SpecificChart"], "StackedArea");
    assert_eq!(input(&parts["2"], "SpecificChart")["value"], "StackedColumn");
  }

  #[test]
  fn test_availability_part_for_health_endpoint() {
    let dashboard: Value = serde_json::from_str(&render_dashboard(&context()).unwrap()).unwrap();
    let part = &dashboard["properties"]["lenses"]["0"]["parts"]["0"];
    let query = input(part, "Query")["value"].as_str().unwrap();

    assert!(query.contains("matches regex \"/health$\""));
    assert!(query.contains("let threshold = 0.99;"));
    assert!(query.contains("watermark=threshold"));
    assert_eq!(input(part, "PartTitle")["value"], "Availability (5m)");
    assert_eq!(part["metadata"]["settings"]["content"]["Query"], query);
  }

  #[test]
  fn test_base_path_prefixes_subtitle() {
    let mut ctx = context();
    ctx.base_path = Some("/api".to_string());
    let dashboard: Value = serde_json::from_str(&render_dashboard(&ctx).unwrap()).unwrap();
    let part = &dashboard["properties"]["lenses"]["0"]["parts"]["0"];

    assert_eq!(input(part, "PartSubTitle")["value"], "/api/health");
    assert!(input(part, "Query")["value"].as_str().unwrap().contains("\"/api/health$\""));
  }
}
