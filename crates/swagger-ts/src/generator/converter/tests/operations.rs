use serde_json::json;

use super::load;
use crate::{
  generator::{
    converter::{ConvertedOperations, OperationConverter},
    errors::GenerateError,
    operation_registry::OperationRegistry,
    type_registry::TypeRegistry,
  },
  spec::ApiSpec,
};

fn convert<'a>(spec: &'a ApiSpec, registry: &mut TypeRegistry<'a>) -> Result<ConvertedOperations, GenerateError> {
  let operations = OperationRegistry::from_spec(spec)?;
  OperationConverter::new(registry).convert_all(operations.operations())
}

fn users_spec() -> ApiSpec {
  load(json!({
    "openapi": "3.0.3",
    "paths": {
      "/users": {
        "get": {
          "operationId": "queryUsers",
          "summary": "查询用户",
          "parameters": [
            { "name": "current", "in": "query", "schema": { "type": "integer" } },
            { "name": "pageSize", "in": "query", "schema": { "type": "integer" } },
            { "name": "name", "in": "query", "description": "用户名", "schema": { "type": "string" } }
          ],
          "responses": {
            "200": {
              "content": {
                "application/json": {
                  "schema": {
                    "type": "object",
                    "properties": {
                      "data": {
                        "type": "object",
                        "properties": {
                          "count": { "type": "integer" },
                          "list": { "type": "array", "items": { "$ref": "#/components/schemas/User" } }
                        }
                      }
                    }
                  }
                }
              }
            }
          }
        },
        "post": {
          "operationId": "createUser",
          "summary": "创建用户失败",
          "requestBody": {
            "required": true,
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/User" } } }
          },
          "responses": { "200": { "description": "ok" } }
        }
      },
      "/users/{data}": {
        "parameters": [{ "name": "data", "in": "path", "required": true, "schema": { "type": "integer" } }],
        "get": { "operationId": "getUser", "responses": {} },
        "put": {
          "operationId": "getUser",
          "parameters": [{ "name": "force", "in": "query", "required": true, "schema": { "type": "boolean" } }],
          "requestBody": {
            "content": {
              "multipart/form-data": {
                "schema": { "type": "object", "properties": { "file": { "type": "string", "format": "binary" } } }
              }
            }
          },
          "responses": {}
        }
      }
    },
    "components": {
      "schemas": {
        "User": { "type": "object", "properties": { "id": { "type": "string" } } }
      }
    }
  }))
}

#[test]
fn test_page_query_extends_page_param() {
  let spec = users_spec();
  let mut registry = TypeRegistry::new(&spec);
  let converted = convert(&spec, &mut registry).unwrap();

  let query_users = &converted.operations[0];
  assert_eq!(query_users.name, "queryUsers");
  let query = query_users.query.as_ref().unwrap();
  assert_eq!(query.type_name, "UsersQueryParam");
  assert!(query.optional);
  assert_eq!(query_users.returns.type_expr, "PageResult<User>");
  assert_eq!(query_users.error_text, "查询用户失败");

  let definition = registry.get("UsersQueryParam").unwrap();
  assert_eq!(definition.extends, vec!["PageParam".to_string()]);
  let properties = &definition.schema.get().as_item().unwrap().properties;
  assert_eq!(properties.keys().collect::<Vec<_>>(), vec!["name"]);
  let name = properties["name"].as_item().unwrap();
  assert_eq!(name.description.as_deref(), Some("用户名"));

  assert!(converted.uses_page_result);
  assert!(converted.traces[0].paginated);
  assert_eq!(converted.traces[0].query_type.as_deref(), Some("UsersQueryParam?+PageParam"));
  assert_eq!(converted.traces[0].query_fields, vec!["name".to_string()]);
}

#[test]
fn test_reference_body_and_failure_text() {
  let spec = users_spec();
  let mut registry = TypeRegistry::new(&spec);
  let converted = convert(&spec, &mut registry).unwrap();

  let create = &converted.operations[1];
  let body = create.body.as_ref().unwrap();
  assert_eq!(body.type_name, "User");
  assert!(!body.optional);
  assert!(!body.is_form);
  assert!(create.returns.is_void);
  assert_eq!(create.error_text, "创建用户失败");
}

#[test]
fn test_path_params_names_and_form_bodies() {
  let spec = users_spec();
  let mut registry = TypeRegistry::new(&spec);
  let converted = convert(&spec, &mut registry).unwrap();

  let names: Vec<&str> = converted.operations.iter().map(|op| op.name.as_str()).collect();
  assert_eq!(names, vec!["queryUsers", "createUser", "getUser", "getUser2"]);

  let get_user = &converted.operations[2];
  assert_eq!(get_user.path_params.len(), 1);
  assert_eq!(get_user.path_params[0].name, "data");
  assert_eq!(get_user.path_params[0].variable, "dataParam");
  assert_eq!(get_user.path_params[0].type_expr, "number");
  assert!(get_user.query.is_none());

  let update = &converted.operations[3];
  let query = update.query.as_ref().unwrap();
  assert_eq!(query.type_name, "GetUser2QueryParam");
  assert!(!query.optional);
  let body = update.body.as_ref().unwrap();
  assert_eq!(body.type_name, "GetUser2Body");
  assert!(body.optional);
  assert!(body.is_form);
  assert_eq!(registry.get("GetUser2Body").unwrap().description.as_deref(), Some("FormData"));

  assert_eq!(
    converted.used_types,
    vec!["GetUser2Body", "GetUser2QueryParam", "User", "UsersQueryParam"]
  );
}

#[test]
fn test_dangling_body_reference_is_fatal() {
  let spec = load(json!({
    "openapi": "3.0.3",
    "paths": {
      "/upload": {
        "post": {
          "requestBody": {
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Nope" } } }
          },
          "responses": {}
        }
      }
    }
  }));
  let mut registry = TypeRegistry::new(&spec);

  let error = convert(&spec, &mut registry).unwrap_err();
  assert_eq!(
    error,
    GenerateError::RequestBody {
      method: "POST".to_string(),
      path: "/upload".to_string(),
      source: Box::new(GenerateError::UnresolvedReference("#/components/schemas/Nope".to_string())),
    }
  );
}
