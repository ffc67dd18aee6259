//! Builders turn a spec-derived [`TemplateContext`] into an artifact.
//!
//! A builder owns its base properties and a render function. `produce` merges
//! the caller's [`Overrides`] onto a copy of the properties and renders the
//! result; `package` writes the artifact and its companion files to disk when
//! the builder supports it.

mod factory;
mod raw;
mod terraform;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

pub use factory::{BuilderType, DashboardSettings, create_builder};
pub use raw::RawDashboardBuilder;
pub use terraform::TerraformDashboardBuilder;

use super::{context::TemplateContext, overrides::Overrides};
use crate::error::{Error, Result};

pub type TemplateFn = fn(&TemplateContext) -> Result<String>;

/// Render function plus the properties it renders from.
#[derive(Debug, Clone)]
pub struct BuilderBase {
  template: TemplateFn,
  properties: TemplateContext,
}

impl BuilderBase {
  pub fn new(template: TemplateFn, properties: TemplateContext) -> Self {
    Self { template, properties }
  }

  /// Renders the base properties patched with `overrides`.
  ///
  /// The stored properties are left as they were.
  pub fn render(&self, overrides: &Overrides) -> Result<String> {
    let context = overrides.apply_to(&self.properties)?;
    (self.template)(&context)
  }

  pub fn props(&self) -> &TemplateContext {
    &self.properties
  }

  pub fn props_mut(&mut self) -> &mut TemplateContext {
    &mut self.properties
  }
}

#[async_trait]
pub trait Builder: Send {
  /// Type name used in diagnostics.
  fn name(&self) -> &'static str;

  fn produce(&mut self, overrides: &Overrides) -> Result<String>;

  /// Writes the artifact and its companion files under `output`.
  ///
  /// Returns every file written.
  async fn package(&mut self, _output: &Path, _overrides: &Overrides) -> Result<Vec<PathBuf>> {
    Err(Error::InvalidBuilder(format!(
      "Packaging not supported for {}. Only azure-dashboard template type supports packaging.",
      self.name()
    )))
  }

  fn props(&self) -> &TemplateContext;
}
