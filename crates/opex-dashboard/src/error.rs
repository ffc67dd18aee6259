use std::path::{Path, PathBuf};

use strum::Display;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds surfaced by every stage of the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The configuration or the resolved spec cannot be used for monitoring.
  #[error("{0}")]
  Config(String),
  /// The spec document could not be parsed or one of its references resolved.
  #[error("OA3 parsing error: {0}")]
  Parse(String),
  /// A filesystem read or write failed.
  #[error("{message} ({})", path.display())]
  File { path: PathBuf, message: String },
  /// Unknown builder type, unsupported builder operation, or a failed construction.
  #[error("{0}")]
  InvalidBuilder(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
  Config,
  Parse,
  File,
  InvalidBuilder,
}

impl Error {
  pub fn config(message: impl Into<String>) -> Self {
    Self::Config(message.into())
  }

  pub fn parse(message: impl std::fmt::Display) -> Self {
    Self::Parse(message.to_string())
  }

  pub fn file(path: impl AsRef<Path>, message: impl std::fmt::Display) -> Self {
    Self::File {
      path: path.as_ref().to_path_buf(),
      message: message.to_string(),
    }
  }

  #[must_use]
  pub const fn kind(&self) -> ErrorKind {
    match self {
      Self::Config(_) => ErrorKind::Config,
      Self::Parse(_) => ErrorKind::Parse,
      Self::File { .. } => ErrorKind::File,
      Self::InvalidBuilder(_) => ErrorKind::InvalidBuilder,
    }
  }
}
