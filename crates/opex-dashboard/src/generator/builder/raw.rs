use super::{Builder, BuilderBase, DashboardSettings};
use crate::{
  error::{Error, Result},
  generator::{
    context::{EvaluationDefaults, TemplateContext},
    extractor::extract,
    overrides::Overrides,
    templates::render_dashboard,
  },
  spec::ResolvedSpec,
};

/// Renders the Azure Portal dashboard JSON straight from the spec.
#[derive(Debug, Clone)]
pub struct RawDashboardBuilder {
  base: BuilderBase,
  spec: ResolvedSpec,
  evaluation: EvaluationDefaults,
}

impl RawDashboardBuilder {
  /// Fails when the document carries no `paths` object.
  pub fn new(spec: ResolvedSpec, settings: &DashboardSettings) -> Result<Self> {
    if !spec.as_value().get("paths").is_some_and(serde_json::Value::is_object) {
      return Err(Error::config("OpenAPI spec must declare a \"paths\" object"));
    }

    let properties = TemplateContext {
      availability_threshold: settings.availability_threshold,
      data_source_id: settings.data_source_id.clone(),
      evaluation_frequency: settings.evaluation.frequency,
      evaluation_time_window: settings.evaluation.time_window,
      event_occurrences: settings.evaluation.event_occurrences,
      location: settings.location.clone(),
      name: settings.name.clone(),
      queries: settings.queries.clone(),
      resource_type: settings.resource_type,
      response_time_threshold: settings.response_time_threshold,
      timespan: settings.timespan.clone(),
      ..TemplateContext::default()
    };

    Ok(Self {
      base: BuilderBase::new(render_dashboard, properties),
      spec,
      evaluation: settings.evaluation,
    })
  }

  /// Re-extracts hosts and endpoints into the base properties.
  fn refresh(&mut self) -> Result<()> {
    let props = self.base.props();
    let extraction = extract(
      &self.spec,
      &self.evaluation,
      props.availability_threshold,
      props.response_time_threshold,
    )?;

    let props = self.base.props_mut();
    props.hosts = extraction.hosts;
    props.endpoints = extraction.endpoints;
    Ok(())
  }

  /// The context `produce` would render, without rendering it.
  pub fn context(&mut self, overrides: &Overrides) -> Result<TemplateContext> {
    self.refresh()?;
    overrides.normalized().apply_to(self.base.props())
  }
}

impl Builder for RawDashboardBuilder {
  fn name(&self) -> &'static str {
    "RawDashboardBuilder"
  }

  fn produce(&mut self, overrides: &Overrides) -> Result<String> {
    self.refresh()?;
    self.base.render(&overrides.normalized())
  }

  fn props(&self) -> &TemplateContext {
    self.base.props()
  }
}
