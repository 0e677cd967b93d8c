//! Implementation of the `nextstack addFunctions` command.
//!
//! Writes the function definitions and the stack description to
//! `<output-root>/stack.json` for the host framework to merge.

use anyhow::Result;

use nextstack_lib::pipeline::Stage;

use super::{GlobalArgs, run_stages};

pub fn cmd_add_functions(args: &GlobalArgs) -> Result<()> {
  run_stages(args, &[Stage::AddFunctions])
}
