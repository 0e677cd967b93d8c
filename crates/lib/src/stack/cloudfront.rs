//! Rendering a [`DistributionPlan`] as a CloudFront `DistributionConfig`.

use serde_json::{Map, Value, json};

use super::intrinsic::{get_att, reference};
use crate::distribution::{CacheBehaviorTemplate, DistributionPlan, Origin, OriginConnection, PolicyRef};

fn policy_value(policy: PolicyRef) -> Value {
  match policy {
    PolicyRef::Managed(id) => json!(id),
    PolicyRef::Resource(logical_id) => reference(logical_id),
  }
}

/// A cache behavior. `path_pattern` is `None` for the default behavior.
pub fn cache_behavior(template: &CacheBehaviorTemplate, path_pattern: Option<&str>) -> Value {
  let mut behavior = Map::new();

  if let Some(pattern) = path_pattern {
    behavior.insert("PathPattern".into(), json!(pattern));
  }
  behavior.insert("AllowedMethods".into(), json!(template.allowed_methods));
  behavior.insert("CachedMethods".into(), json!(template.cached_methods));
  behavior.insert("CachePolicyId".into(), policy_value(template.cache_policy));
  if let Some(policy) = template.origin_request_policy {
    behavior.insert("OriginRequestPolicyId".into(), policy_value(policy));
  }
  behavior.insert("TargetOriginId".into(), json!(template.target_origin));
  behavior.insert("ViewerProtocolPolicy".into(), json!(template.viewer_protocol_policy));
  behavior.insert("Compress".into(), json!(true));

  if !template.function_associations.is_empty() {
    let associations: Vec<Value> = template
      .function_associations
      .iter()
      .map(|a| {
        json!({
          "EventType": a.event_type,
          "FunctionARN": get_att(a.function, "FunctionMetadata.FunctionARN"),
        })
      })
      .collect();
    behavior.insert("FunctionAssociations".into(), Value::Array(associations));
  }

  Value::Object(behavior)
}

pub fn origin(origin: &Origin) -> Value {
  let mut value = Map::new();
  value.insert("Id".into(), json!(origin.id));
  value.insert("DomainName".into(), origin.domain_name.clone());

  match &origin.connection {
    OriginConnection::CustomHttps => {
      value.insert(
        "CustomOriginConfig".into(),
        json!({
          "OriginProtocolPolicy": "https-only",
          "OriginSSLProtocols": ["TLSv1.2"],
        }),
      );
    }
    OriginConnection::Bucket { access_control } => {
      value.insert("OriginAccessControlId".into(), access_control.clone());
      // Access control replaces the legacy identity, which must stay empty.
      value.insert("S3OriginConfig".into(), json!({ "OriginAccessIdentity": "" }));
    }
  }

  if let Some(path) = origin.origin_path {
    value.insert("OriginPath".into(), json!(path));
  }

  Value::Object(value)
}

/// The full `DistributionConfig` property of the distribution resource.
pub fn distribution_config(plan: &DistributionPlan) -> Value {
  let mut config = Map::new();
  config.insert("Enabled".into(), json!(true));
  config.insert("HttpVersion".into(), json!("http2and3"));
  config.insert("IPV6Enabled".into(), json!(true));
  config.insert("Origins".into(), plan.origins().iter().map(origin).collect());
  config.insert(
    "DefaultCacheBehavior".into(),
    cache_behavior(plan.default_behavior(), None),
  );
  config.insert(
    "CacheBehaviors".into(),
    plan
      .bindings()
      .iter()
      .map(|b| cache_behavior(&b.template, Some(&b.pattern)))
      .collect(),
  );

  if let Some(viewer) = plan.viewer() {
    config.insert("Aliases".into(), json!(viewer.aliases));
    config.insert(
      "ViewerCertificate".into(),
      json!({
        "AcmCertificateArn": viewer.certificate,
        "SslSupportMethod": "sni-only",
        "MinimumProtocolVersion": "TLSv1.2_2021",
      }),
    );
  }

  Value::Object(config)
}
