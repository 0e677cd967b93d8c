//! Host lifecycle adapter.
//!
//! The host deployment framework calls `nextstack hook <event>` at each
//! lifecycle event; the event decides which stages run.

use anyhow::Result;

use nextstack_lib::pipeline::stages_for_event;

use super::{GlobalArgs, run_stages};
use crate::output::print_info;

pub fn cmd_hook(args: &GlobalArgs, event: &str) -> Result<()> {
  let stages = stages_for_event(event);
  if stages.is_empty() {
    print_info(&format!("No stages bound to '{}'", event));
    return Ok(());
  }

  let names: Vec<&str> = stages.iter().map(|s| s.name()).collect();
  print_info(&format!("{} {} {}", event, crate::output::symbols::ARROW, names.join(", ")));

  run_stages(args, stages)
}
