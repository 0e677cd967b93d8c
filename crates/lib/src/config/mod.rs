//! Deployment configuration.
//!
//! Settings are resolved from four layers, later layers winning:
//! 1. built-in defaults
//! 2. the config file (`serverless.yml` by default)
//! 3. environment variables (`NEXTSTACK_STAGE`, `NEXTSTACK_REGION`)
//! 4. command-line overrides
//!
//! The result is a fully typed [`DeployConfig`] with no optional fields left
//! to interpret, except the alias/certificate pair which stays optional.

mod types;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::build::BuildOptions;
use crate::consts::DEFAULT_OUTPUT_DIR;
use crate::distribution::Aliases;
use crate::layout::OutputLayout;

pub use types::{ConfigFile, CustomSection, FunctionOverrides, FunctionsSection, OpenNextSection, ProviderSection};

pub const DEFAULT_STAGE: &str = "dev";
pub const DEFAULT_REGION: &str = "us-east-1";

pub const STAGE_ENV: &str = "NEXTSTACK_STAGE";
pub const REGION_ENV: &str = "NEXTSTACK_REGION";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_yaml::Error },

  #[error("config {} does not name a service", path.display())]
  MissingService { path: PathBuf },
}

/// Values given on the command line. `None` leaves the lower layers in effect.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
  pub stage: Option<String>,
  pub region: Option<String>,
}

/// Fully resolved deployment configuration.
#[derive(Debug, Clone)]
pub struct DeployConfig {
  pub service: String,
  pub stage: String,
  pub region: String,
  /// Directory the config file lives in. The site build runs here.
  pub project_dir: PathBuf,
  pub output_dir: PathBuf,
  pub aliases: Option<Aliases>,
  pub certificate: Option<String>,
  pub build: BuildOptions,
  pub functions: FunctionsSection,
}

impl DeployConfig {
  /// Load and resolve the config file at `path`.
  pub fn load(path: &Path, overrides: &Overrides) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let file: ConfigFile = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    let project_dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    };

    Self::resolve(file, project_dir, overrides).ok_or_else(|| ConfigError::MissingService {
      path: path.to_path_buf(),
    })
  }

  /// Merge the config layers. Returns `None` when no service name is set.
  pub fn resolve(file: ConfigFile, project_dir: PathBuf, overrides: &Overrides) -> Option<Self> {
    let service = file.service.filter(|s| !s.is_empty())?;
    let section = file.custom.open_next;

    let stage = pick(overrides.stage.clone(), STAGE_ENV, file.provider.stage, DEFAULT_STAGE);
    let region = pick(overrides.region.clone(), REGION_ENV, file.provider.region, DEFAULT_REGION);

    let mut build = BuildOptions::default();
    if let Some(command) = section.build.command {
      build.command = command;
    }
    if let Some(args) = section.build.args {
      build.args = args;
    }

    debug!(service = %service, stage = %stage, region = %region, "resolved config");

    Some(Self {
      service,
      stage,
      region,
      project_dir,
      output_dir: section.output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
      aliases: section.aliases,
      certificate: section.certificate,
      build,
      functions: section.functions,
    })
  }

  /// Name of the deployed stack: `<service>-<stage>`.
  pub fn stack_name(&self) -> String {
    format!("{}-{}", self.service, self.stage)
  }

  pub fn layout(&self) -> OutputLayout {
    OutputLayout::resolve(&self.project_dir, &self.output_dir)
  }
}

/// Highest-precedence non-empty value among CLI, environment, file, default.
fn pick(cli: Option<String>, env_var: &str, file: Option<String>, default: &str) -> String {
  let non_empty = |v: &String| !v.is_empty();
  cli
    .filter(non_empty)
    .or_else(|| std::env::var(env_var).ok().filter(non_empty))
    .or_else(|| file.filter(non_empty))
    .unwrap_or_else(|| default.to_string())
}
