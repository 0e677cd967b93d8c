//! Site build.
//!
//! The build itself is delegated to the OpenNext CLI. This module only spawns
//! it in the project directory with a fixed set of flags turning off the
//! incremental and DynamoDB-backed caches, which this deployment does not
//! provision.

use std::path::Path;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Flags always appended to the build command.
pub const BUILD_FLAGS: &[&str] = &[
  "--dangerously-disable-incremental-cache",
  "--dangerously-disable-dynamodb-cache",
];

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("failed to spawn build command '{command}': {source}")]
  Spawn { command: String, source: std::io::Error },

  #[error("build command '{command}' failed with exit code {code:?}")]
  Failed { command: String, code: Option<i32> },
}

/// Command used to run the site build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
  pub command: String,
  pub args: Vec<String>,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      command: "npx".to_string(),
      args: vec!["--yes".to_string(), "open-next@2".to_string(), "build".to_string()],
    }
  }
}

impl BuildOptions {
  /// Arguments passed to the command, build flags included.
  pub fn full_args(&self) -> Vec<String> {
    self
      .args
      .iter()
      .cloned()
      .chain(BUILD_FLAGS.iter().map(|f| f.to_string()))
      .collect()
  }

  /// The full command line, for logs and errors.
  pub fn command_line(&self) -> String {
    std::iter::once(self.command.clone())
      .chain(self.full_args())
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// Run the site build in `project_dir`.
///
/// Output is inherited so the user sees the build's own progress.
pub async fn run_build(options: &BuildOptions, project_dir: &Path) -> Result<(), BuildError> {
  let command_line = options.command_line();
  info!(command = %command_line, dir = %project_dir.display(), "running site build");

  let status = Command::new(&options.command)
    .args(options.full_args())
    .current_dir(project_dir)
    .status()
    .await
    .map_err(|source| BuildError::Spawn {
      command: command_line.clone(),
      source,
    })?;

  if !status.success() {
    return Err(BuildError::Failed {
      command: command_line,
      code: status.code(),
    });
  }

  debug!("site build finished");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;
  use tracing_test::traced_test;

  #[test]
  fn flags_follow_user_args() {
    let options = BuildOptions {
      command: "pnpm".to_string(),
      args: vec!["exec".to_string(), "open-next".to_string(), "build".to_string()],
    };
    assert_eq!(
      options.full_args(),
      vec![
        "exec",
        "open-next",
        "build",
        "--dangerously-disable-incremental-cache",
        "--dangerously-disable-dynamodb-cache"
      ]
    );
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn successful_command_passes() {
    let temp_dir = TempDir::new().unwrap();
    let options = BuildOptions {
      command: "/bin/sh".to_string(),
      args: vec!["-c".to_string(), "touch built".to_string(), "sh".to_string()],
    };

    run_build(&options, temp_dir.path()).await.unwrap();
    assert!(temp_dir.path().join("built").exists());
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn failing_command_reports_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let options = BuildOptions {
      command: "/bin/sh".to_string(),
      args: vec!["-c".to_string(), "exit 3".to_string(), "sh".to_string()],
    };

    let err = run_build(&options, temp_dir.path()).await.unwrap_err();
    assert!(matches!(err, BuildError::Failed { code: Some(3), .. }));
  }

  #[test]
  fn command_line_includes_flags() {
    assert_eq!(
      BuildOptions::default().command_line(),
      "npx --yes open-next@2 build --dangerously-disable-incremental-cache --dangerously-disable-dynamodb-cache"
    );
  }

  #[cfg(unix)]
  #[tokio::test]
  #[traced_test]
  async fn run_logs_and_reports_command_line() {
    let temp_dir = TempDir::new().unwrap();
    let options = BuildOptions {
      command: "false".to_string(),
      args: vec![],
    };

    let err = run_build(&options, temp_dir.path()).await.unwrap_err();

    assert!(logs_contain("running site build"));
    assert!(logs_contain("false --dangerously-disable-incremental-cache"));
    match err {
      BuildError::Failed { command, .. } => assert_eq!(command, options.command_line()),
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  async fn missing_command_is_a_spawn_error() {
    let temp_dir = TempDir::new().unwrap();
    let options = BuildOptions {
      command: "nextstack-definitely-not-a-command".to_string(),
      args: vec![],
    };

    let err = run_build(&options, temp_dir.path()).await.unwrap_err();
    assert!(matches!(err, BuildError::Spawn { .. }));
  }
}
