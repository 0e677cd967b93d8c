//! Shared utilities.
//!
//! Content-type detection for uploads and test helpers.

pub mod mime;

#[cfg(test)]
pub mod testutil;
