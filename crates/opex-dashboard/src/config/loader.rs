use std::path::Path;

use validator::Validate;

use super::Config;
use crate::{
  error::{Error, Result},
  utils::{STDIN_LOCATION, read_stdin},
};

/// Reads and validates the configuration at `location` (`-` for stdin).
pub async fn load_config(location: &str) -> Result<Config> {
  let content = if location == STDIN_LOCATION {
    read_stdin().await
  } else {
    tokio::fs::read(Path::new(location)).await
  }
  .map_err(|e| Error::file(location, format!("Failed to read config file: {e}")))?;

  parse_config(&content)
}

pub fn parse_config(content: &[u8]) -> Result<Config> {
  let deserializer = serde_yaml::Deserializer::from_slice(content);
  let config: Config =
    serde_path_to_error::deserialize(deserializer).map_err(|e| Error::config(format!("Invalid configuration: {e}")))?;

  config.validate().map_err(|e| invalid("", &e))?;

  if let Some(endpoints) = config.overrides.as_ref().and_then(|overrides| overrides.endpoints.as_ref()) {
    for (key, endpoint) in endpoints {
      endpoint
        .validate()
        .map_err(|e| invalid(&format!("overrides.endpoints.{key}"), &e))?;
    }
  }
  if let Some(queries) = config.overrides.as_ref().and_then(|overrides| overrides.queries.as_ref()) {
    queries.validate().map_err(|e| invalid("overrides.queries", &e))?;
  }
  if let Some(environments) = config.terraform.as_ref().and_then(|terraform| terraform.environments.as_ref()) {
    for (name, environment) in environments {
      if let Some(environment) = environment {
        environment
          .validate()
          .map_err(|e| invalid(&format!("terraform.environments.{name}"), &e))?;
      }
    }
  }

  Ok(config)
}

fn invalid(path: &str, errors: &validator::ValidationErrors) -> Error {
  let details = errors.to_string().replace('\n', "; ");
  if path.is_empty() {
    Error::config(format!("Invalid configuration: {details}"))
  } else {
    Error::config(format!("Invalid configuration: {path}: {details}"))
  }
}
