//! Writes the Terraform companion files of a packaged dashboard.

pub mod assets;

use std::{
  io,
  path::{Path, PathBuf},
};

use indexmap::IndexMap;
use tokio::{fs, task::JoinSet};

use crate::{
  config::{EnvironmentConfig, TerraformConfig},
  error::{Error, Result},
};

pub const MAIN_FILE: &str = "main.tf";
pub const VARIABLES_FILE: &str = "variables.tf";
pub const BACKEND_FILE: &str = "backend.tfvars";
pub const TFVARS_FILE: &str = "terraform.tfvars";
pub const ENV_DIR: &str = "env";

/// Writes `main.tf` and `variables.tf` under `output`, plus the tfvars of the
/// flat terraform settings and of every configured environment.
///
/// Environments without settings, whether `null` or `{}`, are skipped. Environment directories are
/// written concurrently; every failure is reported, and files already written
/// are left in place.
pub async fn generate_assets(output: &Path, terraform: Option<&TerraformConfig>) -> Result<Vec<PathBuf>> {
  write_assets(output, terraform)
    .await
    .map_err(|e| Error::file(output, format!("Failed to generate Terraform assets: {e}")))
}

async fn write_assets(output: &Path, terraform: Option<&TerraformConfig>) -> io::Result<Vec<PathBuf>> {
  let main = output.join(MAIN_FILE);
  let variables = output.join(VARIABLES_FILE);
  tokio::try_join!(
    fs::write(&main, assets::main_tf()),
    fs::write(&variables, assets::VARIABLES_TF)
  )?;
  let mut written = vec![main, variables];

  let Some(terraform) = terraform else {
    return Ok(written);
  };

  if terraform.is_flat() {
    let backend = output.join(BACKEND_FILE);
    let tfvars = output.join(TFVARS_FILE);
    tokio::try_join!(
      fs::write(&backend, assets::backend_tfvars(terraform.backend.as_ref())),
      fs::write(
        &tfvars,
        assets::terraform_tfvars(terraform.prefix.as_deref(), terraform.env_short.as_deref())
      )
    )?;
    written.extend([backend, tfvars]);
  }

  if let Some(environments) = &terraform.environments {
    written.extend(write_environments(output, environments).await?);
  }

  Ok(written)
}

async fn write_environments(
  output: &Path,
  environments: &IndexMap<String, Option<EnvironmentConfig>>,
) -> io::Result<Vec<PathBuf>> {
  let mut tasks = JoinSet::new();
  for (name, environment) in environments {
    let Some(environment) = environment.as_ref().filter(|environment| !environment.is_empty()) else {
      continue;
    };
    let directory = output.join(ENV_DIR).join(name);
    tasks.spawn(write_environment(directory, environment.clone()));
  }

  let mut written = Vec::new();
  let mut failures = Vec::new();
  while let Some(joined) = tasks.join_next().await {
    match joined.map_err(io::Error::other).and_then(|result| result) {
      Ok(files) => written.extend(files),
      Err(e) => failures.push(e.to_string()),
    }
  }

  if !failures.is_empty() {
    failures.sort();
    return Err(io::Error::other(failures.join("; ")));
  }

  written.sort();
  Ok(written)
}

async fn write_environment(directory: PathBuf, environment: EnvironmentConfig) -> io::Result<Vec<PathBuf>> {
  fs::create_dir_all(&directory)
    .await
    .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", directory.display())))?;

  let backend = directory.join(BACKEND_FILE);
  let tfvars = directory.join(TFVARS_FILE);
  tokio::try_join!(
    fs::write(&backend, assets::backend_tfvars(environment.backend.as_ref())),
    fs::write(&tfvars, assets::environment_tfvars(&environment))
  )?;
  Ok(vec![backend, tfvars])
}
