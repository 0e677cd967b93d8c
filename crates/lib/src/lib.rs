//! nextstack-lib: Core types and logic for nextstack
//!
//! This crate turns an OpenNext build output into a deployable stack:
//! - `DistributionPlan`: ordered CDN path bindings and origins
//! - `StackTemplate`: resource and output definitions for the host framework
//! - `DeploymentPlan`: the immutable value handed to the stack sink
//! - `Pipeline`: named lifecycle stages (build, package, upload, invalidate)

pub mod assets;
pub mod build;
pub mod config;
pub mod consts;
pub mod deploy;
pub mod distribution;
pub mod layout;
pub mod package;
pub mod pipeline;
pub mod plan;
pub mod remote;
pub mod stack;
pub mod util;
