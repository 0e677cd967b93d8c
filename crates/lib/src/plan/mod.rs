//! Deployment plan assembly.
//!
//! A [`DeploymentPlan`] is built in one pass from the resolved config and the
//! build output, then handed to the sink whole. Nothing mutates it after
//! [`DeploymentPlan::prepare`] returns.
//!
//! # Sink format
//!
//! ```json
//! {
//!   "functions": { "image": { ... }, "server": { ... } },
//!   "resources": { "Resources": { ... }, "Outputs": { ... } }
//! }
//! ```

mod types;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DeployConfig;
use crate::consts::{ASSET_KEY_PREFIX, IMAGE_FUNCTION_DIR, SERVER_FUNCTION_DIR};
use crate::distribution::{AssetEntry, DistributionError, DistributionPlan, build_plan, scan_asset_manifest};
use crate::layout::OutputLayout;
use crate::stack::StackTemplate;
use crate::stack::intrinsic::reference;
use crate::stack::logical_ids::{IMAGE_FUNCTION_ROLE, SITE_BUCKET};

pub use types::{FunctionDef, PackageDef};

pub const SERVER_FUNCTION: &str = "server";
pub const IMAGE_FUNCTION: &str = "image";

const HANDLER: &str = "index.handler";

#[derive(Debug, Error)]
pub enum PlanError {
  #[error(transparent)]
  Distribution(#[from] DistributionError),

  #[error("failed to serialize stack description: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write stack description {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentPlan {
  pub functions: BTreeMap<String, FunctionDef>,
  pub distribution: DistributionPlan,
  pub stack: StackTemplate,
}

#[derive(Serialize)]
struct StackFile<'a> {
  functions: &'a BTreeMap<String, FunctionDef>,
  resources: &'a StackTemplate,
}

impl DeploymentPlan {
  /// Build the plan for `config` against the build output at `layout`.
  ///
  /// A missing asset directory (no build has run yet) plans no static
  /// bindings; the plan is refreshed after packaging.
  pub fn prepare(config: &DeployConfig, layout: &OutputLayout) -> Result<Self, PlanError> {
    let manifest = asset_manifest(layout)?;
    debug!(entries = manifest.len(), "scanned asset manifest");

    let distribution = build_plan(&manifest, config.aliases.as_ref(), config.certificate.as_deref());
    let stack = StackTemplate::from_plan(&distribution);

    let mut functions = BTreeMap::new();
    functions.insert(
      SERVER_FUNCTION.to_string(),
      generated_function(layout, SERVER_FUNCTION_DIR, None).with_overrides(&config.functions.server),
    );
    functions.insert(
      IMAGE_FUNCTION.to_string(),
      generated_function(layout, IMAGE_FUNCTION_DIR, Some(IMAGE_FUNCTION_ROLE))
        .with_overrides(&config.functions.image),
    );

    Ok(Self {
      functions,
      distribution,
      stack,
    })
  }

  /// Serialized sink document.
  pub fn to_json(&self) -> Result<Value, PlanError> {
    serde_json::to_value(StackFile {
      functions: &self.functions,
      resources: &self.stack,
    })
    .map_err(PlanError::Serialize)
  }

  /// Write the sink document to `path`, creating parent directories.
  ///
  /// Writes to a temporary file first, then renames it into place.
  pub fn write_to(&self, path: &Path) -> Result<(), PlanError> {
    let content = serde_json::to_string_pretty(&self.to_json()?).map_err(PlanError::Serialize)?;

    let write_err = |source| PlanError::Write {
      path: path.to_path_buf(),
      source,
    };

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(write_err)?;
    }

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).map_err(write_err)?;
    fs::rename(&temp_path, path).map_err(write_err)?;

    info!(path = %path.display(), functions = self.functions.len(), resources = self.stack.resources.len(), "wrote stack description");
    Ok(())
  }
}

fn asset_manifest(layout: &OutputLayout) -> Result<Vec<AssetEntry>, PlanError> {
  let dir = layout.assets_dir();
  if !dir.is_dir() {
    warn!(path = %dir.display(), "asset directory not found, planning without static bindings");
    return Ok(Vec::new());
  }
  Ok(scan_asset_manifest(&dir)?)
}

fn generated_function(layout: &OutputLayout, dir: &str, role: Option<&str>) -> FunctionDef {
  let mut environment = BTreeMap::new();
  environment.insert("BUCKET_NAME".to_string(), reference(SITE_BUCKET));
  environment.insert("BUCKET_KEY_PREFIX".to_string(), json!(ASSET_KEY_PREFIX));

  FunctionDef {
    handler: HANDLER.to_string(),
    url: true,
    package: PackageDef {
      individually: true,
      artifact: layout.artifact(dir),
    },
    environment,
    role: role.map(str::to_string),
    memory_size: None,
    timeout: None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{ConfigFile, Overrides};
  use crate::distribution::Aliases;
  use crate::util::testutil::fake_build_output;
  use tempfile::TempDir;

  fn config(yaml: &str) -> DeployConfig {
    let file: ConfigFile = serde_yaml::from_str(yaml).unwrap();
    let overrides = Overrides {
      stage: Some("dev".to_string()),
      region: Some("us-east-1".to_string()),
    };
    DeployConfig::resolve(file, PathBuf::from("."), &overrides).unwrap()
  }

  #[test]
  fn prepare_generates_both_functions() {
    let temp_dir = TempDir::new().unwrap();
    let layout = fake_build_output(temp_dir.path());

    let plan = DeploymentPlan::prepare(&config("service: site\n"), &layout).unwrap();

    let server = &plan.functions[SERVER_FUNCTION];
    assert_eq!(server.handler, "index.handler");
    assert!(server.url);
    assert!(server.package.individually);
    assert_eq!(server.package.artifact, layout.artifact(SERVER_FUNCTION_DIR));
    assert_eq!(server.environment["BUCKET_NAME"], json!({ "Ref": "SiteBucket" }));
    assert_eq!(server.environment["BUCKET_KEY_PREFIX"], json!("_assets"));
    assert!(server.role.is_none());

    let image = &plan.functions[IMAGE_FUNCTION];
    assert_eq!(image.package.artifact, layout.artifact(IMAGE_FUNCTION_DIR));
    assert_eq!(image.role.as_deref(), Some("ImageFunctionRole"));
  }

  #[test]
  fn prepare_binds_scanned_assets() {
    let temp_dir = TempDir::new().unwrap();
    let layout = fake_build_output(temp_dir.path());

    let plan = DeploymentPlan::prepare(&config("service: site\n"), &layout).unwrap();

    let patterns: Vec<&str> = plan.distribution.bindings().iter().map(|b| b.pattern.as_str()).collect();
    assert_eq!(
      patterns,
      vec!["api/*", "_next/data/*", "_next/image*", "_next/*", "favicon.ico", "images/*"]
    );
  }

  #[test]
  fn prepare_without_assets_plans_fixed_bindings_only() {
    let temp_dir = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp_dir.path());

    let plan = DeploymentPlan::prepare(&config("service: site\n"), &layout).unwrap();

    assert_eq!(plan.distribution.bindings().len(), 3);
  }

  #[test]
  fn user_overrides_win_over_generated_values() {
    let temp_dir = TempDir::new().unwrap();
    let layout = fake_build_output(temp_dir.path());
    let config = config(
      r#"
service: site
custom:
  open-next:
    functions:
      server:
        memorySize: 1536
        timeout: 15
        environment:
          BUCKET_KEY_PREFIX: custom
          LOG_LEVEL: debug
"#,
    );

    let plan = DeploymentPlan::prepare(&config, &layout).unwrap();

    let server = &plan.functions[SERVER_FUNCTION];
    assert_eq!(server.memory_size, Some(1536));
    assert_eq!(server.timeout, Some(15));
    assert_eq!(server.environment["BUCKET_KEY_PREFIX"], json!("custom"));
    assert_eq!(server.environment["LOG_LEVEL"], json!("debug"));
    assert_eq!(server.environment["BUCKET_NAME"], json!({ "Ref": "SiteBucket" }));

    let image = &plan.functions[IMAGE_FUNCTION];
    assert_eq!(image.memory_size, None);
    assert_eq!(image.environment["BUCKET_KEY_PREFIX"], json!("_assets"));
  }

  #[test]
  fn viewer_config_flows_into_the_plan() {
    let temp_dir = TempDir::new().unwrap();
    let layout = fake_build_output(temp_dir.path());
    let config = config(
      r#"
service: site
custom:
  open-next:
    aliases: [shop.example.com]
    certificate: arn:cert
"#,
    );

    let plan = DeploymentPlan::prepare(&config, &layout).unwrap();

    let viewer = plan.distribution.viewer().unwrap();
    assert_eq!(viewer.aliases, Aliases::List(vec!["shop.example.com".to_string()]).to_list());
    assert_eq!(viewer.certificate, "arn:cert");
  }

  #[test]
  fn identical_inputs_give_identical_plans() {
    let temp_dir = TempDir::new().unwrap();
    let layout = fake_build_output(temp_dir.path());
    let config = config("service: site\n");

    let first = DeploymentPlan::prepare(&config, &layout).unwrap();
    let second = DeploymentPlan::prepare(&config, &layout).unwrap();

    assert_eq!(first, second);
  }

  #[test]
  fn write_to_emits_functions_and_resources() {
    let temp_dir = TempDir::new().unwrap();
    let layout = fake_build_output(temp_dir.path());
    let plan = DeploymentPlan::prepare(&config("service: site\n"), &layout).unwrap();

    plan.write_to(&layout.stack_file()).unwrap();

    let content = fs::read_to_string(layout.stack_file()).unwrap();
    let value: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["functions"]["server"]["handler"], "index.handler");
    assert_eq!(value["functions"]["image"]["role"], "ImageFunctionRole");
    assert!(value["functions"]["server"].get("role").is_none());
    assert_eq!(
      value["resources"]["Resources"]["CloudFrontDistribution"]["Type"],
      "AWS::CloudFront::Distribution"
    );
    assert!(value["resources"]["Outputs"]["SiteURL"].is_object());
    assert!(!layout.root().join("stack.json.tmp").exists());
  }
}
