//! Function definitions handed to the host framework.
//!
//! Serializes to the host framework's function shape:
//!
//! ```json
//! {
//!   "handler": "index.handler",
//!   "url": true,
//!   "package": { "individually": true, "artifact": ".open-next/server-function.zip" },
//!   "environment": { "BUCKET_NAME": { "Ref": "SiteBucket" }, "BUCKET_KEY_PREFIX": "_assets" }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::FunctionOverrides;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDef {
  pub individually: bool,
  pub artifact: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDef {
  pub handler: String,
  /// Expose the function through a function URL.
  pub url: bool,
  pub package: PackageDef,
  pub environment: BTreeMap<String, Value>,
  /// Logical id of the execution role. `None` uses the host framework's default role.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub memory_size: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timeout: Option<u32>,
}

impl FunctionDef {
  /// Apply user overrides. User values replace generated ones key by key.
  pub fn with_overrides(mut self, overrides: &FunctionOverrides) -> Self {
    if overrides.memory_size.is_some() {
      self.memory_size = overrides.memory_size;
    }
    if overrides.timeout.is_some() {
      self.timeout = overrides.timeout;
    }
    for (key, value) in &overrides.environment {
      self.environment.insert(key.clone(), Value::String(value.clone()));
    }
    self
  }
}
