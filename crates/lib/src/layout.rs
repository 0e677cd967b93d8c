//! Paths inside the build output directory.
//!
//! ```text
//! {output_root}/
//! ├── assets/                          # static files, uploaded under `_assets/`
//! ├── server-function/                 # server compute unit
//! ├── server-function.zip              # packaged by `build.package`
//! ├── image-optimization-function/     # image compute unit
//! ├── image-optimization-function.zip
//! └── stack.json                       # stack description written by `addFunctions`
//! ```

use std::path::{Path, PathBuf};

use crate::consts::{ASSETS_DIR, STACK_FILE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
  root: PathBuf,
}

impl OutputLayout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Layout for `output_dir` resolved against the project directory.
  ///
  /// Absolute `output_dir` values are used as-is.
  pub fn resolve(project_dir: &Path, output_dir: &Path) -> Self {
    let root = project_dir.join(output_dir);
    Self::new(dunce::simplified(&root).to_path_buf())
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn assets_dir(&self) -> PathBuf {
    self.root.join(ASSETS_DIR)
  }

  /// Source directory of a compute unit.
  pub fn function_dir(&self, name: &str) -> PathBuf {
    self.root.join(name)
  }

  /// Archive path of a compute unit: `<output-root>/<name>.zip`.
  pub fn artifact(&self, name: &str) -> PathBuf {
    self.root.join(format!("{}.zip", name))
  }

  pub fn stack_file(&self) -> PathBuf {
    self.root.join(STACK_FILE)
  }
}
