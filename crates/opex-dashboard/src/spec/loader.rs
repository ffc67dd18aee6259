use std::{ffi::OsStr, path::Path};

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  Json,
  Yaml,
  /// No recognizable extension; JSON is tried first, then YAML.
  #[default]
  Unknown,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext.to_ascii_lowercase().as_str() {
      "json" => Self::Json,
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Unknown,
    }
  }

  #[must_use]
  pub fn from_path(path: &Path) -> Self {
    path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(Self::default(), Self::from_extension)
  }

  pub fn parse(self, bytes: &[u8]) -> Result<Value> {
    match self {
      Self::Json => serde_json::from_slice(bytes).map_err(Error::parse),
      Self::Yaml => serde_yaml::from_slice(bytes).map_err(Error::parse),
      Self::Unknown => serde_json::from_slice(bytes)
        .or_else(|_| serde_yaml::from_slice(bytes))
        .map_err(Error::parse),
    }
  }
}

pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> Result<Self> {
    let file = AsyncMmapFile::open(path)
      .await
      .map_err(|e| Error::parse(format!("Unable to read {}: {e}", path.display())))?;

    Ok(Self {
      file,
      format: SpecFormat::from_path(path),
    })
  }

  pub fn parse(&self) -> Result<Value> {
    self.format.parse(self.file.as_slice())
  }
}
