//! Raw config file schema.
//!
//! Mirrors the subset of a `serverless.yml` this tool reads. Every field is
//! optional here; defaults are applied when resolving into [`DeployConfig`](super::DeployConfig).
//! Unknown keys are ignored so the file can carry the host framework's own settings.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::distribution::Aliases;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ConfigFile {
  pub service: Option<String>,
  #[serde(default)]
  pub provider: ProviderSection,
  #[serde(default)]
  pub custom: CustomSection,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProviderSection {
  pub stage: Option<String>,
  pub region: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CustomSection {
  #[serde(rename = "open-next", default)]
  pub open_next: OpenNextSection,
}

/// Settings under `custom.open-next`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenNextSection {
  pub aliases: Option<Aliases>,
  pub certificate: Option<String>,
  pub output_dir: Option<PathBuf>,
  #[serde(default)]
  pub build: BuildSection,
  #[serde(default)]
  pub functions: FunctionsSection,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BuildSection {
  pub command: Option<String>,
  pub args: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunctionsSection {
  #[serde(default)]
  pub server: FunctionOverrides,
  #[serde(default)]
  pub image: FunctionOverrides,
}

/// User overrides for one generated function. Applied on top of generated values.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionOverrides {
  pub memory_size: Option<u32>,
  pub timeout: Option<u32>,
  #[serde(default)]
  pub environment: BTreeMap<String, String>,
}
