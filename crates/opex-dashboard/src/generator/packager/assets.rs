//! Fixed Terraform companion files written next to `opex.tf`.

use crate::config::{BackendConfig, EnvironmentConfig};

const TERRAFORM_VERSION: &str = ">=1.1.5";
const AZURERM_VERSION: &str = ">= 3.86.0, <=3.116.0";

fn quoted(value: Option<&str>) -> String {
  value
    .filter(|value| !value.is_empty())
    .map(|value| format!("\"{value}\""))
    .unwrap_or_default()
}

pub fn backend_tfvars(backend: Option<&BackendConfig>) -> String {
  let backend = backend.cloned().unwrap_or_default();
  format!(
    "resource_group_name  = {}
storage_account_name = {}
container_name       = {}
key                  = {}
use_azuread_auth    = \"true\"
",
    quoted(backend.resource_group_name.as_deref()),
    quoted(backend.storage_account_name.as_deref()),
    quoted(backend.container_name.as_deref()),
    quoted(backend.key.as_deref()),
  )
}

pub fn terraform_tfvars(prefix: Option<&str>, env_short: Option<&str>) -> String {
  format!("prefix    = {}\nenv_short = {}\n", quoted(prefix), quoted(env_short))
}

pub fn environment_tfvars(environment: &EnvironmentConfig) -> String {
  terraform_tfvars(environment.prefix.as_deref(), environment.env_short.as_deref())
}

pub fn main_tf() -> String {
  format!(
    r#"terraform {{
  required_version = "{TERRAFORM_VERSION}"

  required_providers {{
    azurerm = {{
      source  = "hashicorp/azurerm"
      version = "{AZURERM_VERSION}"
    }}
  }}

  backend "azurerm" {{}}
}}

provider "azurerm" {{
  features {{}}
}}
"#
  )
}

pub const VARIABLES_TF: &str = r#"variable "prefix" {
  type    = string
  validation {
    condition = (
      length(var.prefix) <= 6
    )
    error_message = "Max length is 6 chars."
  }
}

variable "env_short" {
  type = string
  validation {
    condition = (
      length(var.env_short) <= 1
    )
    error_message = "Max length is 1 chars."
  }
}

variable "tags" {
  type = map(any)
  default = {
    CreatedBy = "Terraform"
  }
}
"#;
