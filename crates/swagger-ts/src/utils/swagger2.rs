//! Swagger 2.0 to OpenAPI 3 upgrade, performed on the raw JSON tree.
//!
//! Only what the generator reads is carried over: component tables, parameters,
//! request bodies, and response schemas. Hosts, security definitions, and
//! response headers are dropped.

use serde_json::{Map, Value, json};

const OPENAPI_VERSION: &str = "3.0.3";
const JSON_CONTENT_TYPE: &str = "application/json";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";
const URLENCODED_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

const REF_REWRITES: [(&str, &str); 3] = [
  ("#/definitions/", "#/components/schemas/"),
  ("#/parameters/", "#/components/parameters/"),
  ("#/responses/", "#/components/responses/"),
];

/// Keywords of a non-body Swagger 2 parameter that belong to its schema in OpenAPI 3.
const SCHEMA_KEYWORDS: [&str; 14] = [
  "type",
  "format",
  "items",
  "enum",
  "default",
  "minimum",
  "maximum",
  "exclusiveMinimum",
  "exclusiveMaximum",
  "minLength",
  "maxLength",
  "pattern",
  "minItems",
  "maxItems",
];

const HTTP_METHODS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

/// Rewrites a Swagger 2 document into the OpenAPI 3 layout.
pub fn upgrade(document: Value) -> Result<Value, String> {
  let Value::Object(mut root) = document else {
    return Err("document root is not an object".to_string());
  };

  let consumes = string_list(root.get("consumes"));
  let produces = string_list(root.get("produces"));
  let shared_parameters = take_object(&mut root, "parameters")?;

  let mut components = Map::new();
  components.insert("schemas".to_string(), Value::Object(take_object(&mut root, "definitions")?));

  let parameters: Map<String, Value> = shared_parameters
    .iter()
    .filter(|(_, parameter)| !is_payload_parameter(parameter))
    .map(|(name, parameter)| (name.clone(), convert_parameter(parameter.clone())))
    .collect();
  components.insert("parameters".to_string(), Value::Object(parameters));

  let responses: Map<String, Value> = take_object(&mut root, "responses")?
    .into_iter()
    .map(|(name, response)| (name, convert_response(response, &produces)))
    .collect();
  components.insert("responses".to_string(), Value::Object(responses));

  let mut paths = take_object(&mut root, "paths")?;
  for item in paths.values_mut() {
    let Value::Object(item) = item else {
      return Err("path item is not an object".to_string());
    };
    upgrade_path_item(item, &shared_parameters, &consumes, &produces)?;
  }

  let mut upgraded = Map::new();
  upgraded.insert("openapi".to_string(), Value::String(OPENAPI_VERSION.to_string()));
  if let Some(info) = root.remove("info") {
    upgraded.insert("info".to_string(), info);
  }
  upgraded.insert("paths".to_string(), Value::Object(paths));
  upgraded.insert("components".to_string(), Value::Object(components));

  let mut upgraded = Value::Object(upgraded);
  rewrite_refs(&mut upgraded);
  Ok(upgraded)
}

fn take_object(root: &mut Map<String, Value>, key: &str) -> Result<Map<String, Value>, String> {
  match root.remove(key) {
    None | Some(Value::Null) => Ok(Map::new()),
    Some(Value::Object(map)) => Ok(map),
    Some(_) => Err(format!("'{key}' is not an object")),
  }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
  value
    .and_then(Value::as_array)
    .map(|items| items.iter().filter_map(Value::as_str).map(String::from).collect())
    .unwrap_or_default()
}

fn location(parameter: &Value) -> Option<&str> {
  parameter.get("in").and_then(Value::as_str)
}

fn is_payload_parameter(parameter: &Value) -> bool {
  matches!(location(parameter), Some("body" | "formData"))
}

fn upgrade_path_item(
  item: &mut Map<String, Value>,
  shared_parameters: &Map<String, Value>,
  consumes: &[String],
  produces: &[String],
) -> Result<(), String> {
  let item_parameters = resolve_parameters(item.remove("parameters"), shared_parameters);
  let (item_payload, item_plain): (Vec<Value>, Vec<Value>) =
    item_parameters.into_iter().partition(is_payload_parameter);
  if !item_plain.is_empty() {
    item.insert(
      "parameters".to_string(),
      Value::Array(item_plain.into_iter().map(convert_parameter).collect()),
    );
  }

  for method in HTTP_METHODS {
    let Some(operation) = item.get_mut(method) else {
      continue;
    };
    let Value::Object(operation) = operation else {
      return Err(format!("operation '{method}' is not an object"));
    };
    upgrade_operation(operation, &item_payload, shared_parameters, consumes, produces);
  }
  Ok(())
}

/// Inlines refs to shared body and form parameters, which have no OpenAPI 3
/// parameter counterpart. Refs to plain parameters are kept.
fn resolve_parameters(parameters: Option<Value>, shared: &Map<String, Value>) -> Vec<Value> {
  let Some(Value::Array(parameters)) = parameters else {
    return Vec::new();
  };
  parameters
    .into_iter()
    .map(|parameter| {
      let target = parameter
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|reference| reference.strip_prefix("#/parameters/"))
        .and_then(|name| shared.get(name));
      match target {
        Some(target) if is_payload_parameter(target) => target.clone(),
        _ => parameter,
      }
    })
    .collect()
}

fn upgrade_operation(
  operation: &mut Map<String, Value>,
  inherited_payload: &[Value],
  shared_parameters: &Map<String, Value>,
  consumes: &[String],
  produces: &[String],
) {
  let own_consumes = string_list(operation.remove("consumes").as_ref());
  let own_produces = string_list(operation.remove("produces").as_ref());
  let consumes = if own_consumes.is_empty() { consumes } else { &own_consumes };
  let produces = if own_produces.is_empty() { produces } else { &own_produces };

  let parameters = resolve_parameters(operation.remove("parameters"), shared_parameters);
  let mut plain = Vec::new();
  let mut body = None;
  let mut form_fields = Vec::new();

  for parameter in inherited_payload.iter().cloned().chain(parameters) {
    match location(&parameter) {
      Some("body") => body = Some(parameter),
      Some("formData") => form_fields.push(parameter),
      _ => plain.push(convert_parameter(parameter)),
    }
  }

  if !plain.is_empty() {
    operation.insert("parameters".to_string(), Value::Array(plain));
  }
  if let Some(body) = body {
    operation.insert("requestBody".to_string(), body_request(body, consumes));
  } else if !form_fields.is_empty() {
    operation.insert("requestBody".to_string(), form_request(form_fields, consumes));
  }

  if let Some(Value::Object(responses)) = operation.get_mut("responses") {
    for response in responses.values_mut() {
      *response = convert_response(response.take(), produces);
    }
  }
}

/// Moves schema keywords of a plain parameter under `schema`.
fn convert_parameter(parameter: Value) -> Value {
  let Value::Object(mut parameter) = parameter else {
    return parameter;
  };
  if parameter.contains_key("$ref") || parameter.contains_key("schema") {
    return Value::Object(parameter);
  }

  let mut schema = Map::new();
  for keyword in SCHEMA_KEYWORDS {
    if let Some(value) = parameter.remove(keyword) {
      schema.insert(keyword.to_string(), value);
    }
  }
  parameter.remove("collectionFormat");
  parameter.remove("allowEmptyValue");
  parameter.insert("schema".to_string(), convert_file_type(Value::Object(schema)));
  Value::Object(parameter)
}

fn convert_file_type(mut schema: Value) -> Value {
  if schema.get("type").and_then(Value::as_str) == Some("file") {
    schema["type"] = json!("string");
    schema["format"] = json!("binary");
  }
  schema
}

fn body_request(mut body: Value, consumes: &[String]) -> Value {
  let content_type = consumes
    .iter()
    .find(|content_type| content_type.contains("json"))
    .or_else(|| consumes.first())
    .map_or(JSON_CONTENT_TYPE, String::as_str);

  let mut request = Map::new();
  if let Some(description) = body.get_mut("description").map(Value::take) {
    request.insert("description".to_string(), description);
  }
  request.insert("required".to_string(), body.get("required").cloned().unwrap_or(Value::Bool(false)));
  let schema = body.get_mut("schema").map(Value::take).unwrap_or_else(|| json!({}));
  request.insert("content".to_string(), json!({ content_type: { "schema": schema } }));
  Value::Object(request)
}

fn form_request(fields: Vec<Value>, consumes: &[String]) -> Value {
  let content_type = if consumes.len() == 1 && consumes[0] == URLENCODED_CONTENT_TYPE {
    URLENCODED_CONTENT_TYPE
  } else {
    MULTIPART_CONTENT_TYPE
  };

  let mut properties = Map::new();
  let mut required = Vec::new();
  for field in fields {
    let Some(name) = field.get("name").and_then(Value::as_str).map(String::from) else {
      continue;
    };
    if field.get("required").and_then(Value::as_bool).unwrap_or(false) {
      required.push(Value::String(name.clone()));
    }

    let description = field.get("description").cloned();
    let mut schema = convert_parameter(field).get_mut("schema").map(Value::take).unwrap_or_else(|| json!({}));
    if let (Some(description), Value::Object(schema)) = (description, &mut schema) {
      schema.insert("description".to_string(), description);
    }
    properties.insert(name, schema);
  }

  let mut schema = json!({ "type": "object", "properties": properties });
  if !required.is_empty() {
    schema["required"] = Value::Array(required);
  }
  json!({
    "required": true,
    "content": { content_type: { "schema": schema } }
  })
}

fn convert_response(response: Value, produces: &[String]) -> Value {
  let Value::Object(mut response) = response else {
    return response;
  };
  if response.contains_key("$ref") {
    return Value::Object(response);
  }

  response.remove("headers");
  response.remove("examples");
  if let Some(schema) = response.remove("schema") {
    let content_type = produces
      .iter()
      .find(|content_type| content_type.contains("json"))
      .or_else(|| produces.first())
      .map_or(JSON_CONTENT_TYPE, String::as_str);
    response.insert("content".to_string(), json!({ content_type: { "schema": convert_file_type(schema) } }));
  }
  Value::Object(response)
}

fn rewrite_refs(value: &mut Value) {
  match value {
    Value::Object(map) => {
      for (key, child) in map.iter_mut() {
        if key == "$ref"
          && let Value::String(reference) = child
        {
          for (legacy, current) in REF_REWRITES {
            if let Some(name) = reference.strip_prefix(legacy) {
              *reference = format!("{current}{name}");
              break;
            }
          }
        } else {
          rewrite_refs(child);
        }
      }
    }
    Value::Array(items) => items.iter_mut().for_each(rewrite_refs),
    _ => {}
  }
}
