//! Post-deploy commands: `upload` and `invalidate`.
//!
//! Both degrade to a warning when the stack has not been deployed yet.

use anyhow::Result;

use nextstack_lib::pipeline::Stage;

use super::{GlobalArgs, run_stages};

pub fn cmd_upload(args: &GlobalArgs) -> Result<()> {
  run_stages(args, &[Stage::Upload])
}

pub fn cmd_invalidate(args: &GlobalArgs) -> Result<()> {
  run_stages(args, &[Stage::Invalidate])
}
