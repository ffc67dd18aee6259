use std::path::Path;

use tempfile::NamedTempFile;
use url::Url;

use crate::error::{Error, Result};

/// Returns the URL when `location` points to an HTTP(S) resource.
#[must_use]
pub fn remote_url(location: &str) -> Option<Url> {
  Url::parse(location)
    .ok()
    .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// Downloads a remote spec into a temporary file that is removed on drop.
///
/// The file keeps the extension of the remote path so the loader picks the
/// right format; `.yaml` is used when the URL has none.
pub async fn download_spec(url: &Url) -> Result<NamedTempFile> {
  let response = reqwest::get(url.clone())
    .await
    .map_err(|e| Error::parse(format!("Failed to download spec from {url}: {e}")))?;
  let status = response.status();
  if !status.is_success() {
    return Err(Error::parse(format!("Failed to download spec from {url}: {status}")));
  }
  let body = response
    .bytes()
    .await
    .map_err(|e| Error::parse(format!("Failed to download spec from {url}: {e}")))?;

  let extension = Path::new(url.path())
    .extension()
    .and_then(|ext| ext.to_str())
    .unwrap_or("yaml");
  let file = tempfile::Builder::new()
    .prefix("opex-spec-")
    .suffix(&format!(".{extension}"))
    .tempfile()
    .map_err(|e| Error::file(std::env::temp_dir(), format!("Failed to create temporary spec file: {e}")))?;
  tokio::fs::write(file.path(), &body)
    .await
    .map_err(|e| Error::file(file.path(), format!("Failed to write downloaded spec: {e}")))?;

  Ok(file)
}
