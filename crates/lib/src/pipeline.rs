//! Named deployment stages and the host-event adapter.
//!
//! Stages run strictly one after another; the first failure stops the run.
//! The host deployment framework drives them through lifecycle events, see
//! [`stages_for_event`].

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::build::{BuildError, run_build};
use crate::config::DeployConfig;
use crate::deploy::{self, DeployError, InvalidateOutcome, UploadOutcome};
use crate::package::{PackageError, package_functions};
use crate::plan::{DeploymentPlan, PlanError};
use crate::remote::ControlPlane;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
  AddFunctions,
  Build,
  Package,
  Upload,
  Invalidate,
}

impl Stage {
  pub fn name(self) -> &'static str {
    match self {
      Stage::AddFunctions => "addFunctions",
      Stage::Build => "build",
      Stage::Package => "build.package",
      Stage::Upload => "upload",
      Stage::Invalidate => "invalidate",
    }
  }

  /// Whether the stage talks to the remote control plane.
  pub fn is_remote(self) -> bool {
    matches!(self, Stage::Upload | Stage::Invalidate)
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Stages to run for a host lifecycle event. Unknown events run nothing.
pub fn stages_for_event(event: &str) -> &'static [Stage] {
  match event {
    "before:package:initialize" => &[Stage::AddFunctions],
    "before:package:createDeploymentArtifacts" | "before:package:function:package" => &[Stage::Build, Stage::Package],
    "after:deploy:deploy" => &[Stage::Upload, Stage::Invalidate],
    _ => &[],
  }
}

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("stage '{stage}' failed")]
  Stage {
    stage: Stage,
    #[source]
    source: Box<PipelineError>,
  },

  #[error("stage '{stage}' needs a remote control plane")]
  NoControlPlane { stage: Stage },

  #[error(transparent)]
  Plan(#[from] PlanError),

  #[error(transparent)]
  Build(#[from] BuildError),

  #[error(transparent)]
  Package(#[from] PackageError),

  #[error(transparent)]
  Deploy(#[from] DeployError),
}

/// What a stage did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutput {
  StackWritten(PathBuf),
  Built,
  Packaged(Vec<PathBuf>),
  Uploaded(UploadOutcome),
  Invalidated(InvalidateOutcome),
}

pub struct Pipeline<P> {
  config: DeployConfig,
  remote: Option<P>,
}

impl<P: ControlPlane> Pipeline<P> {
  /// `remote` may be `None` when only local stages will run.
  pub fn new(config: DeployConfig, remote: Option<P>) -> Self {
    Self { config, remote }
  }

  /// Run `stages` in order, stopping at the first failure.
  ///
  /// `on_stage` sees each output as soon as its stage finishes. A failure is
  /// reported as [`PipelineError::Stage`] naming the stage.
  pub async fn run<F>(&self, stages: &[Stage], mut on_stage: F) -> Result<Vec<(Stage, StageOutput)>, PipelineError>
  where
    F: FnMut(Stage, &StageOutput),
  {
    let mut outputs = Vec::with_capacity(stages.len());
    for &stage in stages {
      let output = self.run_stage(stage).await.map_err(|source| PipelineError::Stage {
        stage,
        source: Box::new(source),
      })?;
      on_stage(stage, &output);
      outputs.push((stage, output));
    }
    Ok(outputs)
  }

  pub async fn run_stage(&self, stage: Stage) -> Result<StageOutput, PipelineError> {
    info!(stage = %stage, "running stage");
    let layout = self.config.layout();

    let output = match stage {
      Stage::AddFunctions => StageOutput::StackWritten(self.write_stack()?),
      Stage::Build => {
        run_build(&self.config.build, &self.config.project_dir).await?;
        StageOutput::Built
      }
      Stage::Package => {
        let artifacts = package_functions(&layout).await?;
        // The asset directory exists now; refresh static bindings.
        self.write_stack()?;
        StageOutput::Packaged(artifacts)
      }
      Stage::Upload => {
        let remote = self.remote(stage)?;
        StageOutput::Uploaded(deploy::upload_assets(remote, &self.config.stack_name(), &layout).await?)
      }
      Stage::Invalidate => {
        let remote = self.remote(stage)?;
        StageOutput::Invalidated(deploy::invalidate(remote, &self.config.stack_name()).await?)
      }
    };

    debug!(stage = %stage, "stage finished");
    Ok(output)
  }

  fn remote(&self, stage: Stage) -> Result<&P, PipelineError> {
    self.remote.as_ref().ok_or(PipelineError::NoControlPlane { stage })
  }

  fn write_stack(&self) -> Result<PathBuf, PipelineError> {
    let layout = self.config.layout();
    let plan = DeploymentPlan::prepare(&self.config, &layout)?;
    let path = layout.stack_file();
    plan.write_to(&path)?;
    Ok(path)
  }
}
