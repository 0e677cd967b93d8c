//! CloudFormation intrinsic functions as JSON values.

use serde_json::{Value, json};

/// `{"Ref": id}`
pub fn reference(logical_id: &str) -> Value {
  json!({ "Ref": logical_id })
}

/// `{"Fn::GetAtt": [id, attribute]}`
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
  json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{"Fn::Sub": template}`
pub fn sub(template: &str) -> Value {
  json!({ "Fn::Sub": template })
}

/// `{"Fn::Join": [separator, parts]}`
pub fn join(separator: &str, parts: Vec<Value>) -> Value {
  json!({ "Fn::Join": [separator, parts] })
}

/// Host part of a URL value: third `/`-separated segment of `https://host/`.
pub fn url_host(url: Value) -> Value {
  json!({ "Fn::Select": [2, { "Fn::Split": ["/", url] }] })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_host_selects_third_segment() {
    let value = url_host(get_att("ServerLambdaFunctionUrl", "FunctionUrl"));
    assert_eq!(
      value,
      json!({
        "Fn::Select": [2, { "Fn::Split": ["/", { "Fn::GetAtt": ["ServerLambdaFunctionUrl", "FunctionUrl"] }] }]
      })
    );
  }

  #[test]
  fn join_keeps_part_order() {
    let value = join("", vec![json!("https://"), get_att("D", "DomainName")]);
    assert_eq!(value["Fn::Join"][1][0], "https://");
    assert_eq!(value["Fn::Join"][1][1]["Fn::GetAtt"][0], "D");
  }
}
