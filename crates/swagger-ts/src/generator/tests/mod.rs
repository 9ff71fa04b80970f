
use serde_json::{Value, json};

use crate::spec::ApiSpec;

fn load(value: Value) -> ApiSpec {
  ApiSpec::from_value(value).expect("test spec deserializes")
}

/// A `{ success, data, error }` envelope around `data`.
fn envelope(data: Value) -> Value {
  json!({
    "description": "ok",
    "content": {
      "application/json": {
        "schema": {
          "type": "object",
          "properties": {
            "success": { "type": "boolean" },
            "data": data,
            "error": { "type": "object", "properties": { "message": { "type": "string" } } }
          }
        }
      }
    }
  })
}
