pub mod generate;
pub mod list;

pub use generate::{GenerateConfig, generate_dashboard};
pub use list::list_endpoints;

use tempfile::NamedTempFile;

use crate::{
  error::Result,
  spec::{SpecResolver, download::remote_url, download_spec},
};

/// Resolver for `oa3_spec`; remote specs are downloaded first.
///
/// The returned temp file must outlive the resolver.
pub(crate) async fn spec_resolver(location: &str) -> Result<(SpecResolver, Option<NamedTempFile>)> {
  let Some(url) = remote_url(location) else {
    return Ok((SpecResolver::new(location), None));
  };

  let file = download_spec(&url).await?;
  let resolver = SpecResolver::new(file.path().display().to_string()).with_base_url(url);
  Ok((resolver, Some(file)))
}
