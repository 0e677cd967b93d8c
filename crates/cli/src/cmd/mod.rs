mod add_functions;
mod build;
mod deploy;
mod hook;
mod info;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use nextstack_lib::config::{DeployConfig, Overrides};
use nextstack_lib::deploy::{InvalidateOutcome, UploadOutcome};
use nextstack_lib::pipeline::{Pipeline, Stage, StageOutput};
use nextstack_lib::remote::AwsControlPlane;

use crate::output::{print_stat, print_success, print_warning};

pub use add_functions::cmd_add_functions;
pub use build::{cmd_build, cmd_package};
pub use deploy::{cmd_invalidate, cmd_upload};
pub use hook::cmd_hook;
pub use info::cmd_info;

/// Flags shared by every subcommand.
pub struct GlobalArgs {
  pub config: PathBuf,
  pub overrides: Overrides,
}

impl GlobalArgs {
  pub fn load_config(&self) -> Result<DeployConfig> {
    DeployConfig::load(&self.config, &self.overrides)
      .with_context(|| format!("Failed to load config {}", self.config.display()))
  }
}

pub fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Runtime::new().context("Failed to create async runtime")
}

/// Run `stages` in order and report each result.
///
/// AWS clients are only created when a stage needs them.
pub fn run_stages(args: &GlobalArgs, stages: &[Stage]) -> Result<()> {
  let config = args.load_config()?;
  let rt = runtime()?;

  rt.block_on(async {
    let remote = if stages.iter().any(|s| s.is_remote()) {
      debug!(region = %config.region, "creating AWS clients");
      Some(AwsControlPlane::from_region(&config.region).await)
    } else {
      None
    };

    let pipeline = Pipeline::new(config, remote);
    pipeline.run(stages, |_, output| report(output)).await?;
    Ok::<(), anyhow::Error>(())
  })
}

fn report(output: &StageOutput) {
  match output {
    StageOutput::StackWritten(path) => print_success(&format!("Wrote stack description to {}", path.display())),
    StageOutput::Built => print_success("Site build finished"),
    StageOutput::Packaged(artifacts) => {
      print_success(&format!("Packaged {} function(s)", artifacts.len()));
      for artifact in artifacts {
        print_stat("Archive", &artifact.display().to_string());
      }
    }
    StageOutput::Uploaded(UploadOutcome::NotDeployed) => {
      print_warning("Stack is not deployed, skipped asset upload")
    }
    StageOutput::Uploaded(UploadOutcome::Uploaded { bucket, count }) => {
      print_success(&format!("Uploaded {} asset(s) to {}", count, bucket))
    }
    StageOutput::Invalidated(InvalidateOutcome::Skipped) => {
      print_warning("Distribution is not deployed, skipped invalidation")
    }
    StageOutput::Invalidated(InvalidateOutcome::Invalidated {
      distribution_id,
      invalidation_id,
    }) => {
      print_success(&format!("Invalidated distribution {}", distribution_id));
      print_stat("Invalidation", invalidation_id);
    }
  }
}
