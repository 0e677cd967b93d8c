//! Remote control-plane access.
//!
//! The deploy operations only need four requests against the cloud provider:
//! read a stack's outputs, resolve a resource's physical id, upload an
//! object and invalidate a distribution. [`ControlPlane`] is that seam;
//! [`AwsControlPlane`] implements it with the AWS SDK.
//!
//! A stack or resource that does not exist is not an error here: lookups
//! return `None` and callers decide how to degrade.

mod aws;

use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

pub use aws::AwsControlPlane;

#[derive(Debug, Error)]
pub enum RemoteError {
  #[error("{operation} failed: {message}")]
  Request { operation: &'static str, message: String },

  #[error("failed to read {}: {message}", path.display())]
  ReadBody { path: PathBuf, message: String },
}

impl RemoteError {
  pub fn request(operation: &'static str, err: impl std::fmt::Display) -> Self {
    RemoteError::Request {
      operation,
      message: err.to_string(),
    }
  }
}

/// Outputs of a deployed stack, by output name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackOutputs(pub BTreeMap<String, String>);

impl StackOutputs {
  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.get(name).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StackOutputs {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

/// One object upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObject {
  pub bucket: String,
  pub key: String,
  /// Local file streamed as the object body.
  pub source: PathBuf,
  pub content_type: String,
  pub cache_control: String,
}

pub trait ControlPlane {
  /// Outputs of `stack`, or `None` if the stack does not exist.
  fn stack_outputs(&self, stack: &str) -> impl Future<Output = Result<Option<StackOutputs>, RemoteError>>;

  /// Physical id of the resource `logical_id` in `stack`, or `None` if either does not exist.
  fn stack_resource_id(
    &self,
    stack: &str,
    logical_id: &str,
  ) -> impl Future<Output = Result<Option<String>, RemoteError>>;

  fn put_object(&self, request: PutObject) -> impl Future<Output = Result<(), RemoteError>>;

  /// Invalidate `paths` on `distribution_id`. Returns the invalidation id.
  fn create_invalidation(
    &self,
    distribution_id: &str,
    paths: &[String],
  ) -> impl Future<Output = Result<String, RemoteError>>;
}
