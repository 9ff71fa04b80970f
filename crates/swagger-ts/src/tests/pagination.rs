use serde_json::{Value, json};

use super::common::{content, generate, load, model_imports, ok_response, query_param, request_line, schema_ref};
use crate::{generator::orchestrator::GeneratorOptions, spec::ApiSpec};

const URL: &str = "'/api/v1/sys-api/list'";

fn page_params() -> Vec<Value> {
  vec![
    query_param("current", "integer"),
    query_param("pageSize", "integer"),
    query_param("keyword", "string"),
  ]
}

fn list_spec(parameters: Vec<Value>, data: Value) -> ApiSpec {
  load(json!({
    "openapi": "3.0.3",
    "paths": {
      "/api/v1/sys-api/list": {
        "get": { "summary": "接口分页", "parameters": parameters, "responses": ok_response(data) }
      }
    },
    "components": {
      "schemas": {
        "ApiError": { "type": "object", "properties": { "message": { "type": "string" } } },
        "PaginationBase": {
          "type": "object",
          "properties": { "count": { "type": "integer" }, "list": { "type": "array", "items": {} } }
        },
        "SysApiPage": {
          "type": "object",
          "properties": {
            "count": { "type": "integer" },
            "list": { "type": "array", "items": schema_ref("SysApi") }
          }
        },
        "SysApi": { "type": "object", "properties": { "path": { "type": "string" } } }
      }
    }
  }))
}

fn composed_page() -> Value {
  json!({
    "allOf": [
      schema_ref("PaginationBase"),
      { "type": "object", "properties": { "list": { "type": "array", "items": schema_ref("SysApi") } } }
    ]
  })
}

fn api_file(spec: &ApiSpec) -> String {
  content(&generate(spec, GeneratorOptions::default()), "sysApi/index.ts").to_string()
}

#[test]
fn test_composed_page_becomes_page_result() {
  let api = api_file(&list_spec(page_params(), composed_page()));

  assert!(api.contains("import type { ApiResult, PageResult } from '@/api';\n"));
  assert_eq!(
    request_line(&api, URL).trim(),
    "const res = await request.get<ApiResult<PageResult<SysApi>>>('/api/v1/sys-api/list', { params });"
  );
  assert!(api.contains(" * @returns Promise<PageResult<SysApi>>\n"));
  assert_eq!(model_imports(&api), vec!["GetApiV1SysApiListQueryParam", "SysApi"]);
}

#[test]
fn test_composed_page_without_page_params_keeps_object() {
  let params = vec![query_param("keyword", "string")];
  let api = api_file(&list_spec(params, composed_page()));

  assert!(api.contains("import type { ApiResult } from '@/api';\n"));
  let line = request_line(&api, URL);
  assert!(!line.contains("PageResult"), "{line}");
  assert!(line.contains("request.get<ApiResult<GetApiV1SysApiListResult>>"), "{line}");
}

#[test]
fn test_referenced_page_shape() {
  let paged = api_file(&list_spec(page_params(), schema_ref("SysApiPage")));
  assert!(request_line(&paged, URL).contains("ApiResult<PageResult<SysApi>>"));

  let plain = api_file(&list_spec(Vec::new(), schema_ref("SysApiPage")));
  let line = request_line(&plain, URL);
  assert!(line.contains("ApiResult<SysApiPage>"), "{line}");
  assert!(!plain.contains("PageResult"));
}

#[test]
fn test_array_payload_pages_only_with_page_params() {
  let array = json!({ "type": "array", "items": schema_ref("SysApi") });

  let paged = api_file(&list_spec(page_params(), array.clone()));
  assert!(request_line(&paged, URL).contains("ApiResult<PageResult<SysApi>>"));

  let plain = api_file(&list_spec(Vec::new(), array));
  assert_eq!(
    request_line(&plain, URL).trim(),
    "const res = await request.get<ApiResult<SysApi[]>>('/api/v1/sys-api/list');"
  );
}

#[test]
fn test_page_query_extends_page_param() {
  let output = generate(&list_spec(page_params(), composed_page()), GeneratorOptions::default());
  let model = content(&output, "sysApi/model/index.ts");

  assert!(model.starts_with("import type { PageParam } from '@/api';\n\n"), "{model}");
  assert!(
    model.contains("export interface GetApiV1SysApiListQueryParam extends PageParam {\n  keyword?: string;\n}\n"),
    "{model}"
  );
  assert!(!model.contains("current"));
  assert!(!model.contains("PaginationBase"));
}
