//! Types describing a CDN distribution plan.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP method sets accepted by CloudFront cache behaviors.
pub mod methods {
  pub const READ: &[&str] = &["GET", "HEAD", "OPTIONS"];
  pub const READ_WRITE: &[&str] = &["GET", "HEAD", "OPTIONS", "PUT", "PATCH", "POST", "DELETE"];
}

/// AWS managed cache policies.
pub mod cache_policies {
  pub const CACHING_DISABLED: &str = "4135ea2d-6df8-44a3-9df3-4b5a84be39ad";
  pub const CACHING_OPTIMIZED: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";
}

/// AWS managed origin request policies.
pub mod origin_request_policies {
  pub const ALL_VIEWER_EXCEPT_HOST_HEADER: &str = "b689b0a8-53d0-40ab-baf2-68738e2966ac";
}

pub const REDIRECT_TO_HTTPS: &str = "redirect-to-https";

/// Reference to a cache or origin-request policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyRef {
  /// An AWS managed policy, by id.
  Managed(&'static str),
  /// A policy declared in the same stack, by logical id.
  Resource(&'static str),
}

/// An edge function run for a cache behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionAssociation {
  /// `viewer-request`, `viewer-response`.
  pub event_type: &'static str,
  /// Logical id of the CloudFront function resource.
  pub function: &'static str,
}

/// A named bundle of caching and routing rules.
///
/// Templates are created once per plan and shared by every binding that uses
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheBehaviorTemplate {
  pub name: &'static str,
  pub allowed_methods: &'static [&'static str],
  pub cached_methods: &'static [&'static str],
  pub cache_policy: PolicyRef,
  pub origin_request_policy: Option<PolicyRef>,
  pub target_origin: &'static str,
  pub viewer_protocol_policy: &'static str,
  pub function_associations: Vec<FunctionAssociation>,
}

/// How CloudFront connects to an origin.
#[derive(Debug, Clone, PartialEq)]
pub enum OriginConnection {
  /// HTTPS-only custom origin (a function URL).
  CustomHttps,
  /// Object-storage bucket reached through an origin access control.
  Bucket { access_control: Value },
}

/// An upstream CloudFront fetches uncached content from.
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
  pub id: &'static str,
  pub connection: OriginConnection,
  /// Usually an intrinsic resolved at deploy time.
  pub domain_name: Value,
  pub origin_path: Option<&'static str>,
}

/// A path pattern routed to a cache behavior. Evaluated in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBinding {
  pub pattern: String,
  pub template: Arc<CacheBehaviorTemplate>,
}

impl PathBinding {
  pub fn new(pattern: impl Into<String>, template: &Arc<CacheBehaviorTemplate>) -> Self {
    Self {
      pattern: pattern.into(),
      template: Arc::clone(template),
    }
  }
}

/// Custom domain names, given either as one comma-joined string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Aliases {
  Joined(String),
  List(Vec<String>),
}

impl Aliases {
  /// An empty string or an empty list names no domain at all.
  pub fn is_empty(&self) -> bool {
    match self {
      Aliases::Joined(joined) => joined.is_empty(),
      Aliases::List(list) => list.is_empty(),
    }
  }

  /// The aliases as a list. A joined string is split on `,` without trimming.
  pub fn to_list(&self) -> Vec<String> {
    match self {
      Aliases::Joined(joined) => joined.split(',').map(str::to_string).collect(),
      Aliases::List(list) => list.clone(),
    }
  }
}

/// Custom domain configuration attached to a distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
  pub aliases: Vec<String>,
  /// ARN of the TLS certificate covering the aliases.
  pub certificate: String,
}
