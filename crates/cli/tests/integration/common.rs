//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated project directory with a `serverless.yml`.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  pub fn new(config: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("serverless.yml");
    std::fs::write(&config_path, config).unwrap();
    Self { temp, config_path }
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn output_root(&self) -> PathBuf {
    self.temp.path().join(".open-next")
  }

  /// Lay out what the site build would have produced.
  pub fn fake_build(&self) {
    self.write_file(".open-next/assets/favicon.ico", "ico");
    self.write_file(".open-next/assets/_next/static/chunks/main.js", "js");
    self.write_file(".open-next/assets/images/logo.png", "png");
    self.write_file(".open-next/server-function/index.mjs", "server");
    self.write_file(".open-next/server-function/.next/BUILD_ID", "abc");
    self.write_file(".open-next/image-optimization-function/index.mjs", "image");
  }

  /// The binary, pointed at this environment's config.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("nextstack");
    cmd
      .env_remove("NEXTSTACK_STAGE")
      .env_remove("NEXTSTACK_REGION")
      .arg("--config")
      .arg(&self.config_path);
    cmd
  }

  pub fn read_stack(&self) -> serde_json::Value {
    read_json(&self.output_root().join("stack.json"))
  }
}

pub fn read_json(path: &Path) -> serde_json::Value {
  let content = std::fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
  serde_json::from_str(&content).unwrap()
}

/// Names of the entries in a zip archive.
pub fn zip_entries(path: &Path) -> Vec<String> {
  let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
  (0..archive.len())
    .map(|i| archive.by_index(i).unwrap().name().to_string())
    .collect()
}
