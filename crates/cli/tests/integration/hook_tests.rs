//! Tests for `nextstack hook <event>`.

use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

#[test]
#[serial]
fn initialize_event_adds_functions() {
  let env = TestEnv::new("service: site\n");

  env
    .cmd()
    .arg("hook")
    .arg("before:package:initialize")
    .assert()
    .success()
    .stdout(predicate::str::contains("addFunctions"));

  assert!(env.output_root().join("stack.json").exists());
}

#[cfg(unix)]
#[test]
#[serial]
fn artifact_events_build_and_package() {
  for event in ["before:package:createDeploymentArtifacts", "before:package:function:package"] {
    let env = TestEnv::new("service: site\ncustom:\n  open-next:\n    build:\n      command: \"true\"\n      args: []\n");
    env.fake_build();

    env
      .cmd()
      .arg("hook")
      .arg(event)
      .assert()
      .success()
      .stdout(predicate::str::contains("build, build.package"));

    assert!(env.output_root().join("server-function.zip").exists());
    assert!(env.output_root().join("image-optimization-function.zip").exists());
  }
}

#[test]
#[serial]
fn unbound_event_leaves_output_untouched() {
  let env = TestEnv::new("service: site\n");

  env.cmd().arg("hook").arg("after:remove:remove").assert().success();

  assert!(!env.output_root().exists());
}
