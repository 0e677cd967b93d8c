//! End-to-end tests driving the `nextstack` binary against a fake build output.

mod common;
mod hook_tests;
mod stage_tests;
