//! Typed view of an OpenAPI 3 document.
//!
//! Only the parts that shape generated code are modelled. Unknown keys are
//! ignored so vendor extensions and unused keywords never fail a load.
//! Swagger 2 documents are upgraded to this shape before deserialization.

mod kind;
mod schema;

use std::collections::BTreeMap;

use http::Method;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use kind::{Scalar, SchemaKind};
pub use schema::{AdditionalProperties, RefOr, Schema, SchemaType, SchemaTypeSet};

use crate::utils::refs::{ComponentKind, parse_component_ref};

/// Bounds `$ref` chains that point at other `$ref`s.
const MAX_REF_HOPS: usize = 32;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiSpec {
  pub info: Info,
  pub paths: Option<BTreeMap<String, PathItem>>,
  pub components: Components,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Info {
  #[serde(deserialize_with = "scalar_text")]
  pub title: String,
  #[serde(deserialize_with = "scalar_text")]
  pub version: String,
}

/// Unquoted YAML scalars such as `version: 1.0` arrive as numbers.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  Ok(match Value::deserialize(deserializer)? {
    Value::String(text) => text,
    Value::Null => String::new(),
    other => other.to_string(),
  })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathItem {
  pub parameters: Vec<RefOr<Parameter>>,
  pub get: Option<Operation>,
  pub post: Option<Operation>,
  pub put: Option<Operation>,
  pub patch: Option<Operation>,
  pub delete: Option<Operation>,
  pub head: Option<Operation>,
  pub options: Option<Operation>,
}

impl PathItem {
  pub fn operation(&self, method: &Method) -> Option<&Operation> {
    match *method {
      Method::GET => self.get.as_ref(),
      Method::POST => self.post.as_ref(),
      Method::PUT => self.put.as_ref(),
      Method::PATCH => self.patch.as_ref(),
      Method::DELETE => self.delete.as_ref(),
      Method::HEAD => self.head.as_ref(),
      Method::OPTIONS => self.options.as_ref(),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
  pub operation_id: Option<String>,
  pub summary: Option<String>,
  pub parameters: Vec<RefOr<Parameter>>,
  pub request_body: Option<RefOr<RequestBody>>,
  pub responses: BTreeMap<String, RefOr<Response>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterIn {
  Path,
  Query,
  Header,
  Cookie,
  #[serde(other)]
  Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
  pub name: String,
  #[serde(rename = "in")]
  pub location: ParameterIn,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub required: bool,
  #[serde(default)]
  pub schema: Option<RefOr<Schema>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestBody {
  pub content: BTreeMap<String, MediaType>,
  pub required: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Response {
  pub content: BTreeMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MediaType {
  pub schema: Option<RefOr<Schema>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Components {
  pub schemas: BTreeMap<String, RefOr<Schema>>,
  pub parameters: BTreeMap<String, RefOr<Parameter>>,
  pub request_bodies: BTreeMap<String, RefOr<RequestBody>>,
  pub responses: BTreeMap<String, RefOr<Response>>,
}

impl ApiSpec {
  pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
    serde_json::from_value(value)
  }

  /// Looks up the schema component a `$ref` names, without following further refs.
  pub fn schema_component(&self, ref_path: &str) -> Option<&RefOr<Schema>> {
    let name = parse_component_ref(ref_path, ComponentKind::Schemas)?;
    self.components.schemas.get(name)
  }

  /// Follows `$ref` hops until an inline schema is reached.
  pub fn resolve_schema<'s>(&'s self, schema: &'s RefOr<Schema>) -> Option<&'s Schema> {
    let mut current = schema;
    for _ in 0..MAX_REF_HOPS {
      match current {
        RefOr::Item(schema) => return Some(schema),
        RefOr::Ref { ref_path, .. } => current = self.schema_component(ref_path)?,
      }
    }
    None
  }

  pub fn resolve_parameter<'s>(&'s self, parameter: &'s RefOr<Parameter>) -> Option<&'s Parameter> {
    follow(parameter, ComponentKind::Parameters, &self.components.parameters)
  }

  pub fn resolve_request_body<'s>(&'s self, body: &'s RefOr<RequestBody>) -> Option<&'s RequestBody> {
    follow(body, ComponentKind::RequestBodies, &self.components.request_bodies)
  }

  pub fn resolve_response<'s>(&'s self, response: &'s RefOr<Response>) -> Option<&'s Response> {
    follow(response, ComponentKind::Responses, &self.components.responses)
  }
}

fn follow<'s, T>(item: &'s RefOr<T>, kind: ComponentKind, table: &'s BTreeMap<String, RefOr<T>>) -> Option<&'s T> {
  let mut current = item;
  for _ in 0..MAX_REF_HOPS {
    match current {
      RefOr::Item(item) => return Some(item),
      RefOr::Ref { ref_path, .. } => current = table.get(parse_component_ref(ref_path, kind)?)?,
    }
  }
  None
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn sample() -> ApiSpec {
    ApiSpec::from_value(json!({
      "openapi": "3.0.3",
      "info": { "title": "Sample", "version": "1.0" },
      "paths": {
        "/users": {
          "parameters": [{ "$ref": "#/components/parameters/Tenant" }],
          "get": {
            "operationId": "listUsers",
            "x-internal": true,
            "responses": { "200": { "$ref": "#/components/responses/Users" } }
          }
        }
      },
      "components": {
        "schemas": {
          "User": { "type": "object", "properties": { "id": { "type": "integer" } } },
          "Alias": { "$ref": "#/components/schemas/User" }
        },
        "parameters": {
          "Tenant": { "name": "tenant", "in": "header", "schema": { "type": "string" } }
        },
        "responses": {
          "Users": { "description": "ok", "content": { "application/json": { "schema": { "type": "array" } } } }
        }
      }
    }))
    .unwrap()
  }

  #[test]
  fn test_operation_lookup_by_method() {
    let spec = sample();
    let item = &spec.paths.as_ref().unwrap()["/users"];
    assert_eq!(
      item.operation(&Method::GET).and_then(|op| op.operation_id.as_deref()),
      Some("listUsers")
    );
    assert!(item.operation(&Method::POST).is_none());
  }

  #[test]
  fn test_resolve_schema_follows_alias_chain() {
    let spec = sample();
    let alias = RefOr::Ref {
      ref_path: "#/components/schemas/Alias".to_string(),
      description: None,
    };
    let resolved = spec.resolve_schema(&alias).unwrap();
    assert!(resolved.properties.contains_key("id"));
  }

  #[test]
  fn test_resolve_components() {
    let spec = sample();
    let item = &spec.paths.as_ref().unwrap()["/users"];
    let parameter = spec.resolve_parameter(&item.parameters[0]).unwrap();
    assert_eq!(parameter.name, "tenant");
    assert_eq!(parameter.location, ParameterIn::Header);

    let op = item.get.as_ref().unwrap();
    let response = spec.resolve_response(&op.responses["200"]).unwrap();
    assert!(response.content.contains_key("application/json"));
  }

  #[test]
  fn test_info_accepts_numeric_version() {
    let spec = ApiSpec::from_value(json!({ "info": { "title": "Admin", "version": 1.5 } })).unwrap();
    assert_eq!(spec.info.version, "1.5");
    assert_eq!(spec.info.title, "Admin");
  }

  #[test]
  fn test_missing_paths_is_none() {
    let spec = ApiSpec::from_value(json!({ "openapi": "3.0.0" })).unwrap();
    assert!(spec.paths.is_none());
  }

  #[test]
  fn test_self_referencing_schema_does_not_loop() {
    let spec = ApiSpec::from_value(json!({
      "components": { "schemas": { "Loop": { "$ref": "#/components/schemas/Loop" } } }
    }))
    .unwrap();
    let start = RefOr::Ref {
      ref_path: "#/components/schemas/Loop".to_string(),
      description: None,
    };
    assert!(spec.resolve_schema(&start).is_none());
  }
}
