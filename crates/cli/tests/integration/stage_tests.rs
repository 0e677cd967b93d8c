//! Tests for the individual stage commands.

use predicates::prelude::*;
use serial_test::serial;

use super::common::{TestEnv, zip_entries};

#[test]
#[serial]
fn add_functions_writes_stack_description() {
  let env = TestEnv::new("service: site\n");
  env.fake_build();

  env.cmd().arg("addFunctions").assert().success();

  let stack = env.read_stack();
  let server = &stack["functions"]["server"];
  assert_eq!(server["handler"], "index.handler");
  assert_eq!(server["url"], true);
  assert!(
    server["package"]["artifact"]
      .as_str()
      .unwrap()
      .ends_with("server-function.zip")
  );
  assert_eq!(stack["functions"]["image"]["role"], "ImageFunctionRole");

  let resources = stack["resources"]["Resources"].as_object().unwrap();
  assert_eq!(resources.len(), 8);

  let behaviors = stack["resources"]["Resources"]["CloudFrontDistribution"]["Properties"]["DistributionConfig"]
    ["CacheBehaviors"]
    .as_array()
    .unwrap();
  let patterns: Vec<&str> = behaviors.iter().map(|b| b["PathPattern"].as_str().unwrap()).collect();
  assert_eq!(
    patterns,
    vec!["api/*", "_next/data/*", "_next/image*", "_next/*", "favicon.ico", "images/*"]
  );
}

#[test]
#[serial]
fn add_functions_applies_custom_domain_and_overrides() {
  let env = TestEnv::new(
    r#"
service: site
custom:
  open-next:
    aliases: "shop.example.com,www.shop.example.com"
    certificate: arn:aws:acm:us-east-1:123456789012:certificate/abc
    functions:
      server:
        memorySize: 2048
"#,
  );

  env.cmd().arg("addFunctions").assert().success();

  let stack = env.read_stack();
  assert_eq!(stack["functions"]["server"]["memorySize"], 2048);
  let config = &stack["resources"]["Resources"]["CloudFrontDistribution"]["Properties"]["DistributionConfig"];
  assert_eq!(
    config["Aliases"],
    serde_json::json!(["shop.example.com", "www.shop.example.com"])
  );
  assert_eq!(
    stack["resources"]["Outputs"]["SiteURL"]["Value"],
    "https://shop.example.com"
  );
}

#[test]
#[serial]
fn output_dir_is_read_from_config() {
  let env = TestEnv::new("service: site\ncustom:\n  open-next:\n    outputDir: build/out\n");

  env.cmd().arg("addFunctions").assert().success();

  assert!(env.temp.path().join("build/out/stack.json").exists());
  assert!(!env.output_root().exists());
}

#[test]
#[serial]
fn package_creates_both_archives() {
  let env = TestEnv::new("service: site\n");
  env.fake_build();

  env
    .cmd()
    .arg("build.package")
    .assert()
    .success()
    .stdout(predicate::str::contains("Packaged 2 function(s)"));

  let server = env.output_root().join("server-function.zip");
  let image = env.output_root().join("image-optimization-function.zip");
  assert!(zip_entries(&server).contains(&".next/BUILD_ID".to_string()));
  assert!(zip_entries(&image).contains(&"index.mjs".to_string()));
}

#[cfg(unix)]
#[test]
#[serial]
fn build_runs_configured_command_then_packages() {
  let env = TestEnv::new("service: site\ncustom:\n  open-next:\n    build:\n      command: \"true\"\n      args: []\n");
  env.fake_build();

  env
    .cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Site build finished"))
    .stdout(predicate::str::contains("Packaged 2 function(s)"));
}

#[cfg(unix)]
#[test]
#[serial]
fn failing_build_stops_before_packaging() {
  let env = TestEnv::new("service: site\ncustom:\n  open-next:\n    build:\n      command: \"false\"\n      args: []\n");
  env.fake_build();

  env
    .cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("stage 'build' failed"));

  assert!(!env.output_root().join("server-function.zip").exists());
}
