use serde_json::{Value, json};

use crate::{
  generator::orchestrator::{GeneratedOutput, GeneratorOptions, Orchestrator},
  spec::ApiSpec,
};

pub(crate) fn load(value: Value) -> ApiSpec {
  ApiSpec::from_value(value).expect("test spec deserializes")
}

pub(crate) fn schema_ref(name: &str) -> Value {
  json!({ "$ref": format!("#/components/schemas/{name}") })
}

/// A `200` response wrapping `data` in the `{ success, data, error }` envelope.
pub(crate) fn ok_response(data: Value) -> Value {
  json!({
    "200": {
      "description": "ok",
      "content": {
        "application/json": {
          "schema": {
            "type": "object",
            "properties": {
              "success": { "type": "boolean" },
              "data": data,
              "error": { "$ref": "#/components/schemas/ApiError" }
            }
          }
        }
      }
    }
  })
}

pub(crate) fn query_param(name: &str, type_name: &str) -> Value {
  json!({ "name": name, "in": "query", "schema": { "type": type_name } })
}

/// Admin console document: a paged list, a detail route, a form upload, and a
/// self-referencing `User` reachable only through `SysApi.owner`.
pub(crate) fn admin_document() -> Value {
  json!({
    "openapi": "3.0.3",
    "info": { "title": "Admin", "version": "1.0.0" },
    "paths": {
      "/api/v1/sys-api/list": {
        "get": {
          "summary": "接口分页",
          "parameters": [
            query_param("current", "integer"),
            query_param("pageSize", "integer"),
            query_param("keyword", "string")
          ],
          "responses": ok_response(json!({
            "allOf": [
              schema_ref("PaginationBase"),
              { "type": "object", "properties": { "list": { "type": "array", "items": schema_ref("SysApi") } } }
            ]
          }))
        }
      },
      "/api/v1/sys-api/{id}": {
        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }],
        "get": { "summary": "接口详情", "responses": ok_response(schema_ref("SysApi")) },
        "delete": { "summary": "删除接口", "responses": ok_response(json!({})) }
      },
      "/api/v1/files/upload": {
        "post": {
          "operationId": "uploadFile",
          "requestBody": {
            "required": true,
            "content": {
              "multipart/form-data": {
                "schema": { "type": "object", "properties": { "file": { "type": "string", "format": "binary" } } }
              }
            }
          },
          "responses": ok_response(json!({ "type": "string" }))
        }
      }
    },
    "components": {
      "schemas": {
        "ApiError": { "type": "object", "properties": { "message": { "type": "string" } } },
        "PaginationBase": {
          "type": "object",
          "properties": {
            "count": { "type": "integer" },
            "list": { "type": "array", "items": {} }
          }
        },
        "SysApi": {
          "type": "object",
          "required": ["id"],
          "properties": {
            "id": { "type": "integer" },
            "path": { "type": "string" },
            "owner": schema_ref("User")
          }
        },
        "User": {
          "type": "object",
          "description": "Account owning an API entry",
          "properties": {
            "name": { "type": "string" },
            "manager": schema_ref("User")
          }
        }
      }
    }
  })
}

pub(crate) fn admin_spec() -> ApiSpec {
  load(admin_document())
}

pub(crate) fn generate(spec: &ApiSpec, options: GeneratorOptions<'_>) -> GeneratedOutput {
  Orchestrator::new(spec, options).generate().expect("generation succeeds")
}

pub(crate) fn content<'o>(output: &'o GeneratedOutput, path: &str) -> &'o str {
  &output
    .file(path)
    .unwrap_or_else(|| panic!("missing generated file {path}"))
    .content
}

/// Names declared by `export interface` / `export type` lines of a model bundle.
pub(crate) fn declared_names(model: &str) -> Vec<String> {
  model
    .lines()
    .filter_map(|line| {
      line
        .strip_prefix("export interface ")
        .or_else(|| line.strip_prefix("export type "))
    })
    .filter_map(|rest| rest.split(|c: char| !c.is_alphanumeric() && c != '_').next())
    .filter(|name| !name.is_empty())
    .map(String::from)
    .collect()
}

/// Names listed in an API file's `import type { ... } from './model';` block.
pub(crate) fn model_imports(api: &str) -> Vec<String> {
  let Some(start) = api.find("import type {\n") else {
    return Vec::new();
  };
  let block = &api[start + "import type {\n".len()..];
  let end = block.find("\n} from './model';").expect("model import block is closed");
  block[..end].split(",\n").map(|name| name.trim().to_string()).collect()
}

/// The generated function text that issues a request to `url`.
pub(crate) fn request_line<'a>(api: &'a str, url: &str) -> &'a str {
  api
    .lines()
    .find(|line| line.contains("const res = await request.") && line.contains(url))
    .unwrap_or_else(|| panic!("no request to {url}"))
}
