pub mod builder;
pub mod context;
pub mod extractor;
pub mod overrides;
pub mod packager;
pub mod queries;
pub mod templates;

pub use builder::{Builder, BuilderType, DashboardSettings, RawDashboardBuilder, create_builder};
pub use context::{Endpoint, EvaluationDefaults, QueryConfig, ResourceType, TemplateContext};
pub use overrides::Overrides;
