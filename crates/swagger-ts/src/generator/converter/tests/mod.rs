mod operations;
mod type_resolution;

use serde_json::Value;

use crate::spec::{ApiSpec, RefOr, Schema};

fn load(value: Value) -> ApiSpec {
  ApiSpec::from_value(value).expect("test spec deserializes")
}

fn schema(value: Value) -> RefOr<Schema> {
  serde_json::from_value(value).expect("test schema deserializes")
}
