//! CDN distribution planning.
//!
//! Builds the ordered list of path bindings and the origin list for the site's
//! CloudFront distribution. The plan is pure data: identical inputs always
//! produce the same bindings in the same order.
//!
//! # Precedence
//!
//! CloudFront evaluates cache behaviors in list order and applies the first
//! match. The plan always starts with the three routes that must reach compute:
//!
//! ```text
//! api/*          -> server
//! _next/data/*   -> server
//! _next/image*   -> image
//! <asset>        -> static files   (one per top-level asset entry)
//! (default)      -> server
//! ```

mod manifest;
mod types;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::stack::intrinsic::{get_att, url_host};
use crate::stack::logical_ids::{HOST_HEADER_FUNCTION, ORIGIN_ACCESS_CONTROL, SERVER_CACHE_POLICY, SITE_BUCKET};

pub use manifest::{AssetEntry, AssetKind, scan_asset_manifest};
pub use types::{
  Aliases, CacheBehaviorTemplate, FunctionAssociation, Origin, OriginConnection, PathBinding, PolicyRef, ViewerConfig,
  cache_policies, methods, origin_request_policies,
};

use types::REDIRECT_TO_HTTPS;

/// Origin id of the server compute unit.
pub const SERVER_ORIGIN: &str = "ServerFunction";
/// Origin id of the image compute unit.
pub const IMAGE_ORIGIN: &str = "ImageFunction";
/// Origin id of the static asset bucket.
pub const STATIC_ORIGIN: &str = "StaticFiles";

#[derive(Debug, Error)]
pub enum DistributionError {
  #[error("failed to list static assets in {}: {source}", path.display())]
  ScanAssets { path: PathBuf, source: std::io::Error },

  #[error("static asset name is not valid UTF-8: {}", path.display())]
  NonUtf8Name { path: PathBuf },
}

/// The three cache behavior templates every plan uses.
#[derive(Debug, Clone)]
pub struct StandardBehaviors {
  pub server: Arc<CacheBehaviorTemplate>,
  pub image: Arc<CacheBehaviorTemplate>,
  pub static_files: Arc<CacheBehaviorTemplate>,
}

impl StandardBehaviors {
  pub fn new() -> Self {
    let host_header = vec![FunctionAssociation {
      event_type: "viewer-request",
      function: HOST_HEADER_FUNCTION,
    }];

    Self {
      server: Arc::new(CacheBehaviorTemplate {
        name: "server",
        allowed_methods: methods::READ_WRITE,
        cached_methods: methods::READ,
        cache_policy: PolicyRef::Resource(SERVER_CACHE_POLICY),
        origin_request_policy: Some(PolicyRef::Managed(
          origin_request_policies::ALL_VIEWER_EXCEPT_HOST_HEADER,
        )),
        target_origin: SERVER_ORIGIN,
        viewer_protocol_policy: REDIRECT_TO_HTTPS,
        function_associations: host_header.clone(),
      }),
      image: Arc::new(CacheBehaviorTemplate {
        name: "image",
        allowed_methods: methods::READ_WRITE,
        cached_methods: methods::READ,
        cache_policy: PolicyRef::Managed(cache_policies::CACHING_DISABLED),
        origin_request_policy: Some(PolicyRef::Managed(
          origin_request_policies::ALL_VIEWER_EXCEPT_HOST_HEADER,
        )),
        target_origin: IMAGE_ORIGIN,
        viewer_protocol_policy: REDIRECT_TO_HTTPS,
        function_associations: host_header,
      }),
      static_files: Arc::new(CacheBehaviorTemplate {
        name: "static-files",
        allowed_methods: methods::READ,
        cached_methods: methods::READ,
        cache_policy: PolicyRef::Managed(cache_policies::CACHING_OPTIMIZED),
        origin_request_policy: None,
        target_origin: STATIC_ORIGIN,
        viewer_protocol_policy: REDIRECT_TO_HTTPS,
        function_associations: Vec::new(),
      }),
    }
  }
}

impl Default for StandardBehaviors {
  fn default() -> Self {
    Self::new()
  }
}

/// The fixed origins, in the order they are declared on the distribution.
pub fn standard_origins() -> Vec<Origin> {
  vec![
    Origin {
      id: SERVER_ORIGIN,
      connection: OriginConnection::CustomHttps,
      domain_name: url_host(get_att("ServerLambdaFunctionUrl", "FunctionUrl")),
      origin_path: None,
    },
    Origin {
      id: IMAGE_ORIGIN,
      connection: OriginConnection::CustomHttps,
      domain_name: url_host(get_att("ImageLambdaFunctionUrl", "FunctionUrl")),
      origin_path: None,
    },
    Origin {
      id: STATIC_ORIGIN,
      connection: OriginConnection::Bucket {
        access_control: get_att(ORIGIN_ACCESS_CONTROL, "Id"),
      },
      domain_name: get_att(SITE_BUCKET, "RegionalDomainName"),
      origin_path: Some("/_assets"),
    },
  ]
}

/// Ordered path bindings, default behavior, origins and optional custom domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionPlan {
  bindings: Vec<PathBinding>,
  default_behavior: Arc<CacheBehaviorTemplate>,
  origins: Vec<Origin>,
  viewer: Option<ViewerConfig>,
}

impl DistributionPlan {
  pub fn bindings(&self) -> &[PathBinding] {
    &self.bindings
  }

  /// Behavior applied when no binding pattern matches.
  pub fn default_behavior(&self) -> &Arc<CacheBehaviorTemplate> {
    &self.default_behavior
  }

  pub fn origins(&self) -> &[Origin] {
    &self.origins
  }

  pub fn viewer(&self) -> Option<&ViewerConfig> {
    self.viewer.as_ref()
  }
}

/// Build the distribution plan for a scanned asset manifest.
///
/// Custom aliases take effect only when a certificate is also given, and the
/// other way around; a lone alias list or certificate is ignored. Empty values
/// count as absent. Duplicate
/// manifest names are not rejected and produce duplicate bindings.
pub fn build_plan(
  asset_manifest: &[AssetEntry],
  custom_aliases: Option<&Aliases>,
  custom_certificate: Option<&str>,
) -> DistributionPlan {
  let behaviors = StandardBehaviors::new();

  let mut bindings = Vec::with_capacity(3 + asset_manifest.len());
  bindings.push(PathBinding::new("api/*", &behaviors.server));
  bindings.push(PathBinding::new("_next/data/*", &behaviors.server));
  bindings.push(PathBinding::new("_next/image*", &behaviors.image));

  for entry in asset_manifest {
    bindings.push(PathBinding::new(entry.path_pattern(), &behaviors.static_files));
  }

  let custom_aliases = custom_aliases.filter(|a| !a.is_empty());
  let custom_certificate = custom_certificate.filter(|c| !c.is_empty());

  let viewer = match (custom_aliases, custom_certificate) {
    (Some(aliases), Some(certificate)) => Some(ViewerConfig {
      aliases: aliases.to_list(),
      certificate: certificate.to_string(),
    }),
    _ => None,
  };

  DistributionPlan {
    bindings,
    default_behavior: behaviors.server,
    origins: standard_origins(),
    viewer,
  }
}
