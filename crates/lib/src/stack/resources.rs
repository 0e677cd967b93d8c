//! Resource definitions surrounding the distribution.

use serde_json::{Value, json};

use super::intrinsic::{get_att, reference, sub};
use super::{Resource, logical_ids};

/// Logical id of the role the host framework creates for functions without their own.
pub const DEFAULT_FUNCTION_ROLE: &str = "IamRoleLambdaExecution";

/// Runs at the edge before the origin request so compute sees the viewer's host.
const HOST_HEADER_FUNCTION_CODE: &str = r#"function handler(event) {
  var request = event.request;
  request.headers["x-forwarded-host"] = request.headers.host;
  return request;
}"#;

/// Headers Next.js varies responses on.
const SERVER_CACHE_HEADERS: &[&str] = &[
  "accept",
  "rsc",
  "next-router-prefetch",
  "next-router-state-tree",
  "next-url",
];

pub fn site_bucket() -> Resource {
  Resource::new(
    "AWS::S3::Bucket",
    json!({
      "BucketEncryption": {
        "ServerSideEncryptionConfiguration": [{
          "ServerSideEncryptionByDefault": { "SSEAlgorithm": "AES256" }
        }]
      }
    }),
  )
}

/// Lets only this stack's distribution read objects from the site bucket.
pub fn site_bucket_policy() -> Resource {
  Resource::new(
    "AWS::S3::BucketPolicy",
    json!({
      "Bucket": reference(logical_ids::SITE_BUCKET),
      "PolicyDocument": {
        "Id": "BucketPolicy",
        "Version": "2012-10-17",
        "Statement": [{
          "Sid": "PublicReadForCloudFront",
          "Effect": "Allow",
          "Principal": { "Service": "cloudfront.amazonaws.com" },
          "Action": "s3:GetObject",
          "Resource": [sub("${SiteBucket.Arn}/*")],
          "Condition": {
            "StringEquals": {
              "AWS:SourceArn": sub("arn:aws:cloudfront::${AWS::AccountId}:distribution/${CloudFrontDistribution}")
            }
          }
        }]
      }
    }),
  )
}

pub fn origin_access_control() -> Resource {
  Resource::new(
    "AWS::CloudFront::OriginAccessControl",
    json!({
      "OriginAccessControlConfig": {
        "Name": sub("${AWS::StackName}-oac"),
        "OriginAccessControlOriginType": "s3",
        "SigningBehavior": "always",
        "SigningProtocol": "sigv4"
      }
    }),
  )
}

pub fn host_header_function() -> Resource {
  Resource::new(
    "AWS::CloudFront::Function",
    json!({
      "Name": sub("${AWS::StackName}-host-header"),
      "AutoPublish": true,
      "FunctionCode": HOST_HEADER_FUNCTION_CODE,
      "FunctionConfig": {
        "Comment": "Forward the viewer host header to the origin",
        "Runtime": "cloudfront-js-1.0"
      }
    }),
  )
}

pub fn server_cache_policy() -> Resource {
  Resource::new(
    "AWS::CloudFront::CachePolicy",
    json!({
      "CachePolicyConfig": {
        "Name": sub("${AWS::StackName}-server"),
        "MinTTL": 0,
        "DefaultTTL": 0,
        "MaxTTL": 31536000,
        "ParametersInCacheKeyAndForwardedToOrigin": {
          "EnableAcceptEncodingGzip": true,
          "EnableAcceptEncodingBrotli": true,
          "CookiesConfig": { "CookieBehavior": "all" },
          "QueryStringsConfig": { "QueryStringBehavior": "all" },
          "HeadersConfig": {
            "HeaderBehavior": "whitelist",
            "Headers": SERVER_CACHE_HEADERS
          }
        }
      }
    }),
  )
}

fn bucket_read_statement() -> Value {
  json!({
    "Effect": "Allow",
    "Action": ["s3:GetObject", "s3:ListBucket"],
    "Resource": [
      get_att(logical_ids::SITE_BUCKET, "Arn"),
      sub("${SiteBucket.Arn}/*")
    ]
  })
}

/// Grants the server function's execution role read access to the site bucket.
pub fn server_function_policy() -> Resource {
  Resource::new(
    "AWS::IAM::Policy",
    json!({
      "PolicyName": sub("${AWS::StackName}-server-assets"),
      "Roles": [reference(DEFAULT_FUNCTION_ROLE)],
      "PolicyDocument": {
        "Version": "2012-10-17",
        "Statement": [bucket_read_statement()]
      }
    }),
  )
}

/// Dedicated role for the image function: logs plus bucket reads.
pub fn image_function_role() -> Resource {
  Resource::new(
    "AWS::IAM::Role",
    json!({
      "AssumeRolePolicyDocument": {
        "Version": "2012-10-17",
        "Statement": [{
          "Effect": "Allow",
          "Principal": { "Service": "lambda.amazonaws.com" },
          "Action": "sts:AssumeRole"
        }]
      },
      "ManagedPolicyArns": [
        "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole"
      ],
      "Policies": [{
        "PolicyName": "site-bucket-read",
        "PolicyDocument": {
          "Version": "2012-10-17",
          "Statement": [bucket_read_statement()]
        }
      }]
    }),
  )
}
