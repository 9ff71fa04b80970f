use serde_json::json;

use crate::{
  generator::{
    codegen::{BundleEntry, render_model_bundle, render_type},
    type_registry::{SchemaSource, TypeDefinition, TypeKind, TypeRegistry},
  },
  optionality::{FieldOptionality, OptionalityIndex},
  spec::{ApiSpec, Schema},
};

fn definition<'a>(name: &str, schema: serde_json::Value) -> TypeDefinition<'a> {
  let schema: Schema = serde_json::from_value(schema).expect("test schema deserializes");
  TypeDefinition {
    name: name.to_string(),
    base_name: name.to_string(),
    schema: SchemaSource::from(schema),
    description: None,
    kind: TypeKind::Inline,
    extends: Vec::new(),
  }
}

fn api_schema() -> serde_json::Value {
  json!({
    "type": "object",
    "properties": {
      "path": { "type": "string" },
      "method": { "type": "string" },
      "tag": { "type": "string" }
    }
  })
}

fn candidate(fields: &[(&str, bool)], order: &[&str]) -> FieldOptionality {
  FieldOptionality {
    fields: fields.iter().map(|(name, optional)| ((*name).to_string(), *optional)).collect(),
    field_order: order.iter().map(|name| (*name).to_string()).collect(),
  }
}

#[test]
fn test_interface_required_and_optional_fields() {
  let spec = ApiSpec::default();
  let mut registry = TypeRegistry::new(&spec);
  let mut user = definition(
    "User",
    json!({
      "type": "object",
      "description": "系统用户",
      "required": ["id"],
      "properties": {
        "id": { "type": "integer", "description": "主键" },
        "display-name": { "type": "string" },
        "meta": { "type": "object", "properties": { "tags": { "type": "array", "items": { "type": "string" } } } }
      }
    }),
  );
  user.kind = TypeKind::Named;

  let expected = "\
/** 系统用户 */
export interface User {
  'display-name'?: string;
  /** 主键 */
  id: number;
  meta?: {
    tags?: Array<string>;
  };
}
";
  assert_eq!(render_type(&mut registry, &user), expected);
}

#[test]
fn test_aliases() {
  let spec = ApiSpec::default();
  let mut registry = TypeRegistry::new(&spec);

  let status = definition("Status", json!({ "type": "string", "enum": ["on", "off"], "description": "状态" }));
  assert_eq!(render_type(&mut registry, &status), "/** 状态 */\nexport type Status = 'on' | 'off';\n");

  let ids = definition("Ids", json!({ "type": "array", "items": { "type": "integer" }, "nullable": true }));
  assert_eq!(render_type(&mut registry, &ids), "export type Ids = Array<number> | null;\n");
}

#[test]
fn test_component_alias_points_at_target() {
  let spec = ApiSpec::from_value(json!({
    "openapi": "3.0.0",
    "components": {
      "schemas": {
        "Account": { "$ref": "#/components/schemas/User" },
        "User": { "type": "object", "properties": { "id": { "type": "string" } } }
      }
    }
  }))
  .unwrap();
  let mut registry = TypeRegistry::new(&spec);
  registry.register_ref("#/components/schemas/Account").unwrap();

  let account = registry.get("Account").unwrap().clone();
  assert_eq!(render_type(&mut registry, &account), "export type Account = User;\n");
  assert!(registry.contains("User"));
}

#[test]
fn test_extends_and_dictionaries() {
  let spec = ApiSpec::default();
  let mut registry = TypeRegistry::new(&spec);

  let mut query = definition("UsersQueryParam", json!({ "type": "object", "properties": { "name": { "type": "string" } } }));
  query.extends = vec!["PageParam".to_string()];
  assert_eq!(
    render_type(&mut registry, &query),
    "export interface UsersQueryParam extends PageParam {\n  name?: string;\n}\n"
  );

  let scores = definition("Scores", json!({ "type": "object", "additionalProperties": { "type": "number" } }));
  assert_eq!(
    render_type(&mut registry, &scores),
    "export interface Scores {\n  [key: string]: number;\n}\n"
  );

  let bag = definition("Bag", json!({ "type": "object", "additionalProperties": true }));
  assert_eq!(render_type(&mut registry, &bag), "export interface Bag {\n  [key: string]: any;\n}\n");
}

#[test]
fn test_optionality_candidate_defaults_known_fields_to_required() {
  let spec = ApiSpec::default();
  let mut index = OptionalityIndex::default();
  index.insert("Api", candidate(&[("tag", true)], &["tag", "path"]));
  let mut registry = TypeRegistry::new(&spec).with_optionality(Some(&index));

  let rendered = render_type(&mut registry, &definition("Api", api_schema()));
  assert!(rendered.contains("  path: string;\n"), "{rendered}");
  assert!(rendered.contains("  tag?: string;\n"), "{rendered}");
  assert!(rendered.contains("  method?: string;\n"), "{rendered}");
}

#[test]
fn test_optionality_best_candidate_and_field_order() {
  let spec = ApiSpec::default();
  let mut index = OptionalityIndex::default();
  index.insert("Api", FieldOptionality::default());
  index.insert(
    "Api",
    candidate(&[("path", false), ("method", false), ("tag", true)], &["method", "path", "tag"]),
  );
  let mut registry = TypeRegistry::new(&spec).with_optionality(Some(&index));

  let rendered = render_type(&mut registry, &definition("Api", api_schema()));
  assert_eq!(
    rendered,
    "export interface Api {\n  method: string;\n  path: string;\n  tag?: string;\n}\n"
  );
}

#[test]
fn test_optionality_follows_renamed_component() {
  let spec: ApiSpec = serde_json::from_value(json!({
    "components": {
      "schemas": {
        "User": { "type": "object", "properties": { "id": { "type": "integer" } } },
        "admin.User": { "type": "object", "properties": { "name": { "type": "string" } } }
      }
    }
  }))
  .expect("test spec deserializes");
  let mut index = OptionalityIndex::default();
  index.insert("User", candidate(&[("name", false)], &["name"]));
  let mut registry = TypeRegistry::new(&spec).with_optionality(Some(&index));

  registry.register_ref("#/components/schemas/User").unwrap();
  assert_eq!(registry.register_ref("#/components/schemas/admin.User").unwrap(), "User2");
  let renamed = registry.get("User2").unwrap().clone();

  assert_eq!(
    render_type(&mut registry, &renamed),
    "export interface User2 {\n  name: string;\n}\n"
  );
}

#[test]
fn test_model_bundle() {
  assert_eq!(render_model_bundle(&[]), None);

  let entries = vec![
    BundleEntry::ReExport {
      name: "User".to_string(),
      owner_module: "alpha".to_string(),
    },
    BundleEntry::Declaration {
      name: "Page".to_string(),
      content: "export interface Page extends PageParam {\n}\n".to_string(),
      extends_page_param: true,
    },
    BundleEntry::Declaration {
      name: "Api".to_string(),
      content: "export type Api = string;\n".to_string(),
      extends_page_param: false,
    },
  ];

  let expected = "\
import type { PageParam } from '@/api';

export type Api = string;

export interface Page extends PageParam {
}

export type { User } from '../../alpha/model';
";
  assert_eq!(render_model_bundle(&entries).as_deref(), Some(expected));
  assert!(entries[0].is_reexport());
}

#[test]
fn test_bundle_without_page_param_import() {
  let entries = vec![BundleEntry::Declaration {
    name: "Api".to_string(),
    content: "export type Api = string;\n".to_string(),
    extends_page_param: false,
  }];
  assert_eq!(render_model_bundle(&entries).as_deref(), Some("export type Api = string;\n"));
}
