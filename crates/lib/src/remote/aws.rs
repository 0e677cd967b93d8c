//! AWS SDK implementation of [`ControlPlane`].

use std::time::{SystemTime, UNIX_EPOCH};

use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudformation::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use crate::consts::APP_NAME;

use super::{ControlPlane, PutObject, RemoteError, StackOutputs};

#[derive(Debug, Clone)]
pub struct AwsControlPlane {
  cloudformation: aws_sdk_cloudformation::Client,
  s3: aws_sdk_s3::Client,
  cloudfront: aws_sdk_cloudfront::Client,
}

impl AwsControlPlane {
  /// Clients for `region`, with credentials from the default provider chain.
  pub async fn from_region(region: &str) -> Self {
    let config = aws_config::defaults(BehaviorVersion::latest())
      .region(Region::new(region.to_string()))
      .load()
      .await;

    Self {
      cloudformation: aws_sdk_cloudformation::Client::new(&config),
      s3: aws_sdk_s3::Client::new(&config),
      cloudfront: aws_sdk_cloudfront::Client::new(&config),
    }
  }
}

/// CloudFormation reports missing stacks and resources as a validation error.
fn is_missing<E: ProvideErrorMetadata, R>(err: &SdkError<E, R>) -> bool {
  err
    .as_service_error()
    .and_then(|e| e.message())
    .is_some_and(|m| m.contains("does not exist"))
}

fn caller_reference() -> String {
  let nanos = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_nanos())
    .unwrap_or_default();
  format!("{}-{}", APP_NAME, nanos)
}

impl ControlPlane for AwsControlPlane {
  async fn stack_outputs(&self, stack: &str) -> Result<Option<StackOutputs>, RemoteError> {
    let response = match self.cloudformation.describe_stacks().stack_name(stack).send().await {
      Ok(response) => response,
      Err(err) if is_missing(&err) => {
        debug!(stack = %stack, "stack does not exist");
        return Ok(None);
      }
      Err(err) => return Err(RemoteError::request("DescribeStacks", DisplayErr(&err))),
    };

    let Some(found) = response.stacks().first() else {
      return Ok(None);
    };

    let outputs = found
      .outputs()
      .iter()
      .filter_map(|o| Some((o.output_key()?, o.output_value()?)))
      .collect();

    Ok(Some(outputs))
  }

  async fn stack_resource_id(&self, stack: &str, logical_id: &str) -> Result<Option<String>, RemoteError> {
    let response = match self
      .cloudformation
      .describe_stack_resource()
      .stack_name(stack)
      .logical_resource_id(logical_id)
      .send()
      .await
    {
      Ok(response) => response,
      Err(err) if is_missing(&err) => {
        debug!(stack = %stack, resource = %logical_id, "stack resource does not exist");
        return Ok(None);
      }
      Err(err) => return Err(RemoteError::request("DescribeStackResource", DisplayErr(&err))),
    };

    Ok(
      response
        .stack_resource_detail()
        .and_then(|d| d.physical_resource_id())
        .map(str::to_string),
    )
  }

  async fn put_object(&self, request: PutObject) -> Result<(), RemoteError> {
    let body = ByteStream::from_path(&request.source)
      .await
      .map_err(|e| RemoteError::ReadBody {
        path: request.source.clone(),
        message: e.to_string(),
      })?;

    self
      .s3
      .put_object()
      .bucket(&request.bucket)
      .key(&request.key)
      .content_type(&request.content_type)
      .cache_control(&request.cache_control)
      .body(body)
      .send()
      .await
      .map_err(|e| RemoteError::request("PutObject", DisplayErr(&e)))?;

    Ok(())
  }

  async fn create_invalidation(&self, distribution_id: &str, paths: &[String]) -> Result<String, RemoteError> {
    let paths = Paths::builder()
      .quantity(paths.len() as i32)
      .set_items(Some(paths.to_vec()))
      .build()
      .map_err(|e| RemoteError::request("CreateInvalidation", e))?;

    let batch = InvalidationBatch::builder()
      .paths(paths)
      .caller_reference(caller_reference())
      .build()
      .map_err(|e| RemoteError::request("CreateInvalidation", e))?;

    let response = self
      .cloudfront
      .create_invalidation()
      .distribution_id(distribution_id)
      .invalidation_batch(batch)
      .send()
      .await
      .map_err(|e| RemoteError::request("CreateInvalidation", DisplayErr(&e)))?;

    Ok(
      response
        .invalidation()
        .map(|i| i.id().to_string())
        .unwrap_or_default(),
    )
  }
}

/// Formats an SDK error with its full source chain.
struct DisplayErr<'a, E>(&'a E);

impl<E: std::error::Error> std::fmt::Display for DisplayErr<'_, E> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)?;
    let mut source = self.0.source();
    while let Some(err) = source {
      write!(f, ": {}", err)?;
      source = err.source();
    }
    Ok(())
  }
}
