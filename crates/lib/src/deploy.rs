//! Post-deploy operations against the remote control plane.
//!
//! These run after the host framework has deployed the stack. A stack that
//! was never deployed is not an error: upload, invalidation and info all
//! degrade to a no-op and report that nothing was done.

use thiserror::Error;
use tracing::{info, warn};

use crate::assets::{AssetError, collect_assets};
use crate::layout::OutputLayout;
use crate::remote::{ControlPlane, PutObject, RemoteError, StackOutputs};
use crate::stack::logical_ids::CLOUDFRONT_DISTRIBUTION;
use crate::stack::output_ids::SITE_BUCKET_NAME;

/// Paths invalidated after every deploy.
pub const INVALIDATE_ALL: &str = "/*";

#[derive(Debug, Error)]
pub enum DeployError {
  #[error(transparent)]
  Remote(#[from] RemoteError),

  #[error(transparent)]
  Assets(#[from] AssetError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
  /// No stack or no bucket output; nothing was uploaded.
  NotDeployed,
  Uploaded { bucket: String, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidateOutcome {
  /// No distribution exists yet; no request was made.
  Skipped,
  Invalidated {
    distribution_id: String,
    invalidation_id: String,
  },
}

/// Upload every static asset to the stack's site bucket.
///
/// Uploads run one after another and stop at the first failure. Objects
/// already uploaded stay in place.
pub async fn upload_assets<P: ControlPlane>(
  plane: &P,
  stack: &str,
  layout: &OutputLayout,
) -> Result<UploadOutcome, DeployError> {
  let Some(outputs) = plane.stack_outputs(stack).await? else {
    warn!(stack = %stack, "stack not deployed, skipping asset upload");
    return Ok(UploadOutcome::NotDeployed);
  };

  let Some(bucket) = outputs.get(SITE_BUCKET_NAME) else {
    warn!(stack = %stack, output = SITE_BUCKET_NAME, "stack output missing, skipping asset upload");
    return Ok(UploadOutcome::NotDeployed);
  };

  let files = collect_assets(&layout.assets_dir())?;
  info!(bucket = %bucket, count = files.len(), "uploading assets");

  for file in &files {
    plane
      .put_object(PutObject {
        bucket: bucket.to_string(),
        key: file.key.clone(),
        source: file.source.clone(),
        content_type: file.content_type.to_string(),
        cache_control: file.cache_control.to_string(),
      })
      .await?;
  }

  info!(bucket = %bucket, count = files.len(), "assets uploaded");

  Ok(UploadOutcome::Uploaded {
    bucket: bucket.to_string(),
    count: files.len(),
  })
}

/// Invalidate every cached path on the stack's distribution.
pub async fn invalidate<P: ControlPlane>(plane: &P, stack: &str) -> Result<InvalidateOutcome, DeployError> {
  let Some(distribution_id) = plane.stack_resource_id(stack, CLOUDFRONT_DISTRIBUTION).await? else {
    warn!(stack = %stack, "distribution not deployed, skipping invalidation");
    return Ok(InvalidateOutcome::Skipped);
  };

  let invalidation_id = plane
    .create_invalidation(&distribution_id, &[INVALIDATE_ALL.to_string()])
    .await?;

  info!(distribution = %distribution_id, invalidation = %invalidation_id, "invalidation created");

  Ok(InvalidateOutcome::Invalidated {
    distribution_id,
    invalidation_id,
  })
}

/// Outputs of the deployed stack, or `None` if there is nothing to report.
pub async fn info<P: ControlPlane>(plane: &P, stack: &str) -> Result<Option<StackOutputs>, DeployError> {
  let outputs = plane.stack_outputs(stack).await?;
  Ok(outputs.filter(|o| !o.is_empty()))
}
