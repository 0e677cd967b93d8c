use anyhow::Result;

use nextstack_lib::pipeline::Stage;

use super::{GlobalArgs, run_stages};

/// Run the site build, then package both functions.
pub fn cmd_build(args: &GlobalArgs) -> Result<()> {
  run_stages(args, &[Stage::Build, Stage::Package])
}

/// Package an existing build without rebuilding.
pub fn cmd_package(args: &GlobalArgs) -> Result<()> {
  run_stages(args, &[Stage::Package])
}
