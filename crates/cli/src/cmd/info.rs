use anyhow::{Context, Result};

use nextstack_lib::deploy;
use nextstack_lib::remote::AwsControlPlane;

use super::{GlobalArgs, runtime};
use crate::output::{print_info, print_json, print_stat, print_success};

pub fn cmd_info(args: &GlobalArgs, json: bool) -> Result<()> {
  let config = args.load_config()?;
  let stack = config.stack_name();

  let rt = runtime()?;
  let outputs = rt
    .block_on(async {
      let plane = AwsControlPlane::from_region(&config.region).await;
      deploy::info(&plane, &stack).await
    })
    .context("Failed to read stack outputs")?;

  let Some(outputs) = outputs else {
    if json {
      return print_json(&serde_json::json!({ "stack": stack, "deployed": false }));
    }
    print_info(&format!("Stack {} is not deployed, nothing to report", stack));
    return Ok(());
  };

  if json {
    let values: serde_json::Map<String, serde_json::Value> = outputs
      .iter()
      .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
      .collect();
    return print_json(&serde_json::json!({ "stack": stack, "deployed": true, "outputs": values }));
  }

  print_success(&format!("Stack {}", stack));
  print_stat("Region", &config.region);
  for (name, value) in outputs.iter() {
    print_stat(name, value);
  }

  Ok(())
}
