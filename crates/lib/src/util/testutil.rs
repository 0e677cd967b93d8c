//! Test utilities for nextstack-lib.
//!
//! An in-memory [`ControlPlane`] and helpers that lay out a fake build output.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use crate::consts::{IMAGE_FUNCTION_DIR, SERVER_FUNCTION_DIR};
use crate::layout::OutputLayout;
use crate::remote::{ControlPlane, PutObject, RemoteError, StackOutputs};

/// Records every request; answers lookups from fixed data.
#[derive(Debug, Default)]
pub struct FakeControlPlane {
  /// `None` behaves as a stack that was never deployed.
  pub outputs: Option<StackOutputs>,
  /// Physical ids by logical id.
  pub resources: BTreeMap<String, String>,
  /// Fail every upload whose key ends with this suffix.
  pub fail_key_suffix: Option<String>,
  pub puts: Mutex<Vec<PutObject>>,
  pub invalidations: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeControlPlane {
  /// A deployed stack with the given outputs and resources.
  pub fn deployed(outputs: &[(&str, &str)], resources: &[(&str, &str)]) -> Self {
    Self {
      outputs: Some(outputs.iter().copied().collect()),
      resources: resources.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
      ..Self::default()
    }
  }

  pub fn put_keys(&self) -> Vec<String> {
    self.puts.lock().unwrap().iter().map(|p| p.key.clone()).collect()
  }
}

impl ControlPlane for FakeControlPlane {
  async fn stack_outputs(&self, _stack: &str) -> Result<Option<StackOutputs>, RemoteError> {
    Ok(self.outputs.clone())
  }

  async fn stack_resource_id(&self, _stack: &str, logical_id: &str) -> Result<Option<String>, RemoteError> {
    if self.outputs.is_none() {
      return Ok(None);
    }
    Ok(self.resources.get(logical_id).cloned())
  }

  async fn put_object(&self, request: PutObject) -> Result<(), RemoteError> {
    if let Some(suffix) = &self.fail_key_suffix {
      if request.key.ends_with(suffix.as_str()) {
        return Err(RemoteError::request("PutObject", "access denied"));
      }
    }
    self.puts.lock().unwrap().push(request);
    Ok(())
  }

  async fn create_invalidation(&self, distribution_id: &str, paths: &[String]) -> Result<String, RemoteError> {
    let mut invalidations = self.invalidations.lock().unwrap();
    invalidations.push((distribution_id.to_string(), paths.to_vec()));
    Ok(format!("I{}", invalidations.len()))
  }
}

/// Write `content` at `relative` under `root`, creating parents.
pub fn write_file(root: &Path, relative: &str, content: &str) {
  let path = root.join(relative);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, content).unwrap();
}

/// Populate a minimal OpenNext build output under `root`.
pub fn fake_build_output(root: &Path) -> OutputLayout {
  let layout = OutputLayout::new(root);
  let assets = layout.assets_dir();
  write_file(&assets, "favicon.ico", "ico");
  write_file(&assets, "_next/static/chunks/main.js", "console.log(1)");
  write_file(&assets, "_next/static/css/app.css", "body{}");
  write_file(&assets, "images/logo.png", "png");
  write_file(&layout.function_dir(SERVER_FUNCTION_DIR), "index.mjs", "server");
  write_file(&layout.function_dir(SERVER_FUNCTION_DIR), ".next/BUILD_ID", "abc");
  write_file(&layout.function_dir(IMAGE_FUNCTION_DIR), "index.mjs", "image");
  layout
}
