use serde_json::json;

use super::{load, schema};
use crate::generator::{metrics::GenerationWarning, type_registry::TypeRegistry};

fn components_spec() -> crate::spec::ApiSpec {
  load(json!({
    "openapi": "3.0.3",
    "paths": {},
    "components": {
      "schemas": {
        "User": { "type": "object", "properties": { "id": { "type": "string" } } },
        "Role": { "type": "string", "enum": ["admin", "guest"] }
      }
    }
  }))
}

#[test]
fn test_scalars() {
  let spec = components_spec();
  let mut registry = TypeRegistry::new(&spec);

  let cases = [
    (json!({ "type": "string" }), "string"),
    (json!({ "type": "string", "format": "binary" }), "Blob"),
    (json!({ "type": "integer", "format": "int64" }), "number"),
    (json!({ "type": "number" }), "number"),
    (json!({ "type": "boolean" }), "boolean"),
    (json!({}), "any"),
    (json!({ "type": "array" }), "Array<any>"),
    (json!({ "type": "array", "items": { "type": "string" } }), "Array<string>"),
  ];
  for (input, expected) in cases {
    let input = schema(input);
    assert_eq!(registry.type_expr(Some(&input)), expected, "schema {input:?}");
  }
  assert_eq!(registry.type_expr(None), "any");
  assert!(registry.is_empty());
}

#[test]
fn test_enumerations() {
  let spec = components_spec();
  let mut registry = TypeRegistry::new(&spec);

  let strings = schema(json!({ "type": "string", "enum": ["on", "it's"] }));
  assert_eq!(registry.type_expr(Some(&strings)), "'on' | 'it\\'s'");

  let numbers = schema(json!({ "type": "integer", "enum": [1, 2.5] }));
  assert_eq!(registry.type_expr(Some(&numbers)), "1 | 2.5");

  let mixed = schema(json!({ "enum": [true, { "x": 1 }] }));
  assert_eq!(registry.type_expr(Some(&mixed)), "true | any");
}

#[test]
fn test_nullable_appends_null() {
  let spec = components_spec();
  let mut registry = TypeRegistry::new(&spec);

  let legacy = schema(json!({ "type": "string", "nullable": true }));
  assert_eq!(registry.type_expr(Some(&legacy)), "string | null");

  let listed = schema(json!({ "type": ["integer", "null"] }));
  assert_eq!(registry.type_expr(Some(&listed)), "number | null");
}

#[test]
fn test_composition_registers_references() {
  let spec = components_spec();
  let mut registry = TypeRegistry::new(&spec);

  let union = schema(json!({
    "oneOf": [{ "$ref": "#/components/schemas/User" }, { "$ref": "#/components/schemas/Role" }]
  }));
  assert_eq!(registry.type_expr(Some(&union)), "User | Role");
  assert!(registry.contains("User"));
  assert!(registry.contains("Role"));

  let intersection = schema(json!({
    "allOf": [
      { "$ref": "#/components/schemas/User" },
      { "type": "object", "properties": { "age": { "type": "integer" } }, "required": ["age"] }
    ]
  }));
  assert_eq!(registry.type_expr(Some(&intersection)), "User & {\n  age: number;\n}");
  assert_eq!(registry.len(), 2);
}

#[test]
fn test_records() {
  let spec = components_spec();
  let mut registry = TypeRegistry::new(&spec);

  let dictionary = schema(json!({ "type": "object", "additionalProperties": { "type": "integer" } }));
  assert_eq!(registry.type_expr(Some(&dictionary)), "Record<string, number>");

  let closed = schema(json!({ "type": "object", "additionalProperties": false }));
  assert_eq!(registry.type_expr(Some(&closed)), "Record<string, never>");

  let open = schema(json!({ "type": "object" }));
  assert_eq!(registry.type_expr(Some(&open)), "Record<string, any>");
}

#[test]
fn test_inline_objects_indent_and_quote_keys() {
  let spec = components_spec();
  let mut registry = TypeRegistry::new(&spec);

  let nested = schema(json!({
    "properties": {
      "content-type": { "type": "string" },
      "owner": {
        "type": "object",
        "required": ["id"],
        "properties": { "id": { "type": "integer" } }
      }
    }
  }));
  assert_eq!(
    registry.type_expr(Some(&nested)),
    "{\n  'content-type'?: string;\n  owner?: {\n    id: number;\n  };\n}"
  );
}

#[test]
fn test_unresolved_reference_degrades_to_any() {
  let spec = components_spec();
  let mut registry = TypeRegistry::new(&spec);

  let dangling = schema(json!({ "type": "array", "items": { "$ref": "#/components/schemas/Missing" } }));
  assert_eq!(registry.type_expr(Some(&dangling)), "Array<any>");
  assert_eq!(registry.type_expr(Some(&dangling)), "Array<any>");

  let warnings = registry.take_warnings();
  assert_eq!(warnings.len(), 1);
  assert!(matches!(
    &warnings[0],
    GenerationWarning::UnresolvedReference { reference, .. } if reference == "#/components/schemas/Missing"
  ));
}
