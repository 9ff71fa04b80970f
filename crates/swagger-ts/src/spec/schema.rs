use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Either a `$ref` pointer or an inline item.
///
/// A `$ref` object may carry sibling keys; only `description` is kept, since
/// property documentation is the one sibling that shows up in generated code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
  Ref {
    #[serde(rename = "$ref")]
    ref_path: String,
    #[serde(default)]
    description: Option<String>,
  },
  Item(T),
}

impl<T> RefOr<T> {
  #[cfg(test)]
  pub fn as_item(&self) -> Option<&T> {
    match self {
      Self::Item(item) => Some(item),
      Self::Ref { .. } => None,
    }
  }

  pub fn ref_path(&self) -> Option<&str> {
    match self {
      Self::Ref { ref_path, .. } => Some(ref_path),
      Self::Item(_) => None,
    }
  }
}

impl<T> From<T> for RefOr<T> {
  fn from(item: T) -> Self {
    Self::Item(item)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
  Boolean,
  Integer,
  Number,
  String,
  Array,
  Object,
  Null,
  #[serde(other)]
  Unknown,
}

/// `type` is a single name in OpenAPI 3.0 and may be a list in 3.1.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SchemaTypeSet {
  Single(SchemaType),
  Multiple(Vec<SchemaType>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
  Allowed(bool),
  Schema(Box<RefOr<Schema>>),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
  #[serde(rename = "type")]
  pub schema_type: Option<SchemaTypeSet>,
  pub format: Option<String>,
  pub description: Option<String>,
  #[serde(rename = "enum", deserialize_with = "lenient_values")]
  pub enum_values: Vec<Value>,
  #[serde(deserialize_with = "lenient_bool")]
  pub nullable: bool,
  pub one_of: Vec<RefOr<Schema>>,
  pub any_of: Vec<RefOr<Schema>>,
  pub all_of: Vec<RefOr<Schema>>,
  pub not: Option<Box<RefOr<Schema>>>,
  pub items: Option<Box<RefOr<Schema>>>,
  pub properties: BTreeMap<String, RefOr<Schema>>,
  pub additional_properties: Option<AdditionalProperties>,
  #[serde(deserialize_with = "lenient_strings")]
  pub required: Vec<String>,
}

impl Schema {
  pub fn of_type(schema_type: SchemaType) -> Self {
    Self {
      schema_type: Some(SchemaTypeSet::Single(schema_type)),
      ..Default::default()
    }
  }

  pub fn has_type(&self, schema_type: SchemaType) -> bool {
    match &self.schema_type {
      Some(SchemaTypeSet::Single(single)) => *single == schema_type,
      Some(SchemaTypeSet::Multiple(types)) => types.contains(&schema_type),
      None => false,
    }
  }

  /// First declared type that is not `null`; a lone `null` type is returned as is.
  pub fn primary_type(&self) -> Option<SchemaType> {
    match &self.schema_type {
      Some(SchemaTypeSet::Single(single)) => Some(*single),
      Some(SchemaTypeSet::Multiple(types)) => types
        .iter()
        .copied()
        .find(|t| *t != SchemaType::Null)
        .or_else(|| types.first().copied()),
      None => None,
    }
  }

  pub fn is_nullable(&self) -> bool {
    if self.nullable {
      return true;
    }
    match &self.schema_type {
      Some(SchemaTypeSet::Multiple(types)) => {
        types.contains(&SchemaType::Null) && types.iter().any(|t| *t != SchemaType::Null)
      }
      _ => false,
    }
  }

  pub fn has_type_marker(&self) -> bool {
    match &self.schema_type {
      Some(SchemaTypeSet::Single(_)) => true,
      Some(SchemaTypeSet::Multiple(types)) => !types.is_empty(),
      None => false,
    }
  }

  pub fn is_array(&self) -> bool {
    self.primary_type() == Some(SchemaType::Array)
  }

  /// Explicit object type, declared properties, or any `additionalProperties` marker.
  pub fn is_object_like(&self) -> bool {
    self.has_type(SchemaType::Object) || !self.properties.is_empty() || self.additional_properties.is_some()
  }

  pub fn has_composition(&self) -> bool {
    !self.all_of.is_empty() || !self.one_of.is_empty() || !self.any_of.is_empty()
  }

  /// True when nothing constrains the shape: no type, properties, items,
  /// composition, or enumeration.
  pub fn is_blank(&self) -> bool {
    !self.has_type_marker()
      && self.properties.is_empty()
      && self.items.is_none()
      && !self.has_composition()
      && self.enum_values.is_empty()
  }

  pub fn is_required(&self, property: &str) -> bool {
    self.required.iter().any(|name| name == property)
  }

  #[cfg(test)]
  pub fn with_property(mut self, name: impl Into<String>, schema: impl Into<RefOr<Schema>>) -> Self {
    self.properties.insert(name.into(), schema.into());
    self
  }
}

// Hand-written specs put the odd `null` or boolean where a list belongs.
// Those degrade to the empty default instead of rejecting the document.

fn lenient_values<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Value::deserialize(deserializer)? {
    Value::Array(values) => values,
    _ => Vec::new(),
  })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Value::deserialize(deserializer)? {
    Value::Array(values) => values
      .into_iter()
      .filter_map(|value| value.as_str().map(String::from))
      .collect(),
    _ => Vec::new(),
  })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Value::deserialize(deserializer)?.as_bool().unwrap_or(false))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_ref_or_prefers_reference() {
    let parsed: RefOr<Schema> =
      serde_json::from_value(json!({ "$ref": "#/components/schemas/User", "description": "owner" })).unwrap();
    assert_eq!(parsed.ref_path(), Some("#/components/schemas/User"));

    let inline: RefOr<Schema> = serde_json::from_value(json!({ "type": "string" })).unwrap();
    assert!(inline.as_item().is_some_and(|s| s.has_type(SchemaType::String)));
  }

  #[test]
  fn test_type_list_with_null_is_nullable() {
    let schema: Schema = serde_json::from_value(json!({ "type": ["string", "null"] })).unwrap();
    assert!(schema.is_nullable());
    assert_eq!(schema.primary_type(), Some(SchemaType::String));

    let only_null: Schema = serde_json::from_value(json!({ "type": "null" })).unwrap();
    assert!(!only_null.is_nullable());
    assert_eq!(only_null.primary_type(), Some(SchemaType::Null));
  }

  #[test]
  fn test_additional_properties_bool_or_schema() {
    let closed: Schema = serde_json::from_value(json!({ "additionalProperties": false })).unwrap();
    assert_eq!(closed.additional_properties, Some(AdditionalProperties::Allowed(false)));

    let typed: Schema = serde_json::from_value(json!({ "additionalProperties": { "type": "integer" } })).unwrap();
    assert!(matches!(typed.additional_properties, Some(AdditionalProperties::Schema(_))));
    assert!(typed.is_object_like());
  }

  #[test]
  fn test_lenient_fields() {
    let schema: Schema =
      serde_json::from_value(json!({ "required": true, "enum": null, "nullable": null, "type": "uuid" })).unwrap();
    assert!(schema.required.is_empty());
    assert!(schema.enum_values.is_empty());
    assert!(!schema.nullable);
    assert_eq!(schema.primary_type(), Some(SchemaType::Unknown));
  }

  #[test]
  fn test_blank_schema() {
    assert!(Schema::default().is_blank());
    assert!(!Schema::of_type(SchemaType::Object).is_blank());
    let described = Schema {
      description: Some("payload".to_string()),
      ..Default::default()
    };
    assert!(described.is_blank());
  }
}
