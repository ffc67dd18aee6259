use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use crossterm::style::Stylize;

use super::spec_resolver;
use crate::{
  config::load_config,
  generator::{
    RawDashboardBuilder, TemplateContext,
    queries::{QueryContext, QueryMode},
  },
  ui::{Colors, colors::to_comfy, term_width},
};

/// One row per monitored endpoint with its effective alarm settings.
struct EndpointRow {
  path: String,
  method: String,
  availability: String,
  response_time: String,
  cadence: String,
}

fn endpoint_rows(ctx: &TemplateContext) -> Vec<EndpointRow> {
  ctx
    .endpoints
    .iter()
    .map(|(key, endpoint)| {
      let query = QueryContext::new(ctx, key, endpoint, QueryMode::Display);
      let path = endpoint.path.as_deref().unwrap_or(key);
      let frequency = endpoint
        .availability_evaluation_frequency
        .unwrap_or(ctx.evaluation_frequency);
      let window = endpoint
        .availability_evaluation_time_window
        .unwrap_or(ctx.evaluation_time_window);
      let occurrences = endpoint
        .availability_event_occurrences
        .unwrap_or(ctx.event_occurrences);

      EndpointRow {
        path: format!("{}{path}", ctx.base_path()),
        method: query.method().unwrap_or("*").to_string(),
        availability: format!("{}", query.availability_threshold()),
        response_time: format!("{}s", query.response_time_threshold()),
        cadence: format!("{frequency}m / {window}m x{occurrences}"),
      }
    })
    .collect()
}

pub async fn list_endpoints(config: &str, colors: &Colors) -> anyhow::Result<()> {
  let settings = load_config(config).await?;
  let (resolver, _download) = spec_resolver(&settings.oa3_spec).await?;
  let spec = resolver.resolve().await?;

  let mut builder = RawDashboardBuilder::new(spec, &settings.settings())?;
  let ctx = builder.context(&settings.overrides())?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in ["PATH", "METHOD", "AVAILABILITY", "RESPONSE TIME", "CADENCE"] {
    row.add_cell(Cell::new(header).fg(to_comfy(colors.label())));
  }
  table.set_header(row);

  for endpoint in endpoint_rows(&ctx) {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(endpoint.path)
        .fg(to_comfy(colors.primary()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(endpoint.method)
        .fg(to_comfy(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(endpoint.availability).fg(to_comfy(colors.value())));
    row.add_cell(Cell::new(endpoint.response_time).fg(to_comfy(colors.value())));
    row.add_cell(Cell::new(endpoint.cadence).fg(to_comfy(colors.muted())));
    table.add_row(row);
  }

  println!("{table}");

  let hosts = if ctx.hosts.is_empty() {
    "(none)".with(colors.muted()).to_string()
  } else {
    ctx.hosts.join(", ").with(colors.value()).to_string()
  };
  println!();
  println!("{} {hosts}", "Hosts:".with(colors.label()));

  Ok(())
}
