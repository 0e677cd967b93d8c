//! Stack description handed to the host deployment framework.
//!
//! A [`StackTemplate`] is the set of named resources and outputs this tool
//! contributes to the deployed stack. It serializes to the CloudFormation
//! shape the host framework merges into its own template:
//!
//! ```json
//! {
//!   "Resources": { "SiteBucket": { "Type": "AWS::S3::Bucket", "Properties": { ... } } },
//!   "Outputs": { "SiteURL": { "Description": "...", "Value": ... } }
//! }
//! ```

pub mod cloudfront;
pub mod intrinsic;
pub mod resources;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::distribution::DistributionPlan;
use intrinsic::{get_att, join, reference};

/// Logical ids of the resources in the stack.
pub mod logical_ids {
  pub const SITE_BUCKET: &str = "SiteBucket";
  pub const SITE_BUCKET_POLICY: &str = "SiteBucketPolicy";
  pub const ORIGIN_ACCESS_CONTROL: &str = "OriginAccessControl";
  pub const CLOUDFRONT_DISTRIBUTION: &str = "CloudFrontDistribution";
  pub const SERVER_FUNCTION_POLICY: &str = "ServerFunctionPolicy";
  pub const IMAGE_FUNCTION_ROLE: &str = "ImageFunctionRole";
  pub const HOST_HEADER_FUNCTION: &str = "HostHeaderFunction";
  pub const SERVER_CACHE_POLICY: &str = "ServerCachePolicy";
}

/// Names of the stack outputs.
pub mod output_ids {
  pub const CLOUDFRONT_DOMAIN: &str = "CloudFrontDomain";
  pub const CLOUDFRONT_URL: &str = "CloudFrontURL";
  pub const SITE_URL: &str = "SiteURL";
  pub const SITE_BUCKET_NAME: &str = "SiteBucketName";
}

/// A single resource definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
  #[serde(rename = "Type")]
  pub kind: String,
  #[serde(rename = "Properties")]
  pub properties: Value,
}

impl Resource {
  pub fn new(kind: &str, properties: Value) -> Self {
    Self {
      kind: kind.to_string(),
      properties,
    }
  }
}

/// A single stack output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
  #[serde(rename = "Description")]
  pub description: String,
  #[serde(rename = "Value")]
  pub value: Value,
}

impl Output {
  pub fn new(description: &str, value: Value) -> Self {
    Self {
      description: description.to_string(),
      value,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackTemplate {
  #[serde(rename = "Resources")]
  pub resources: BTreeMap<String, Resource>,
  #[serde(rename = "Outputs")]
  pub outputs: BTreeMap<String, Output>,
}

impl StackTemplate {
  /// Every resource and output needed to serve the planned distribution.
  pub fn from_plan(plan: &DistributionPlan) -> Self {
    let mut template = Self::default();

    template.add_resource(logical_ids::SITE_BUCKET, resources::site_bucket());
    template.add_resource(logical_ids::SITE_BUCKET_POLICY, resources::site_bucket_policy());
    template.add_resource(logical_ids::ORIGIN_ACCESS_CONTROL, resources::origin_access_control());
    template.add_resource(logical_ids::HOST_HEADER_FUNCTION, resources::host_header_function());
    template.add_resource(logical_ids::SERVER_CACHE_POLICY, resources::server_cache_policy());
    template.add_resource(logical_ids::SERVER_FUNCTION_POLICY, resources::server_function_policy());
    template.add_resource(logical_ids::IMAGE_FUNCTION_ROLE, resources::image_function_role());
    template.add_resource(
      logical_ids::CLOUDFRONT_DISTRIBUTION,
      Resource::new(
        "AWS::CloudFront::Distribution",
        json!({ "DistributionConfig": cloudfront::distribution_config(plan) }),
      ),
    );

    let domain = get_att(logical_ids::CLOUDFRONT_DISTRIBUTION, "DomainName");
    let cloudfront_url = join("", vec![json!("https://"), domain.clone()]);
    let site_url = match plan.viewer().and_then(|v| v.aliases.first()) {
      Some(alias) => json!(format!("https://{}", alias)),
      None => cloudfront_url.clone(),
    };

    template.add_output(
      output_ids::CLOUDFRONT_DOMAIN,
      Output::new("CloudFront distribution domain name", domain),
    );
    template.add_output(
      output_ids::CLOUDFRONT_URL,
      Output::new("CloudFront distribution URL", cloudfront_url),
    );
    template.add_output(output_ids::SITE_URL, Output::new("Site URL", site_url));
    template.add_output(
      output_ids::SITE_BUCKET_NAME,
      Output::new("Static asset bucket", reference(logical_ids::SITE_BUCKET)),
    );

    template
  }

  pub fn add_resource(&mut self, logical_id: &str, resource: Resource) {
    self.resources.insert(logical_id.to_string(), resource);
  }

  pub fn add_output(&mut self, name: &str, output: Output) {
    self.outputs.insert(name.to_string(), output);
  }
}
