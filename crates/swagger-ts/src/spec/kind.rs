use serde_json::Value;

use super::schema::{RefOr, Schema, SchemaType};

/// The shape a schema takes once its keywords are reduced to a single category.
///
/// Classification checks keywords in a fixed precedence: enumeration, `oneOf`,
/// `anyOf`, `allOf`, then the declared type, then object markers. Anything
/// left over is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaKind<'s> {
  Reference(&'s str),
  Enumeration(&'s [Value]),
  Union(&'s [RefOr<Schema>]),
  Intersection(&'s [RefOr<Schema>]),
  Scalar(Scalar),
  Array(Option<&'s RefOr<Schema>>),
  Record(&'s Schema),
  Unconstrained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
  String,
  Binary,
  Number,
  Boolean,
  Null,
}

impl Scalar {
  pub const fn as_ts(self) -> &'static str {
    match self {
      Self::String => "string",
      Self::Binary => "Blob",
      Self::Number => "number",
      Self::Boolean => "boolean",
      Self::Null => "null",
    }
  }
}

impl<'s> SchemaKind<'s> {
  pub fn of(schema: &'s RefOr<Schema>) -> Self {
    match schema {
      RefOr::Ref { ref_path, .. } => Self::Reference(ref_path),
      RefOr::Item(schema) => Self::of_schema(schema),
    }
  }

  pub fn of_schema(schema: &'s Schema) -> Self {
    if !schema.enum_values.is_empty() {
      return Self::Enumeration(&schema.enum_values);
    }
    if !schema.one_of.is_empty() {
      return Self::Union(&schema.one_of);
    }
    if !schema.any_of.is_empty() {
      return Self::Union(&schema.any_of);
    }
    if !schema.all_of.is_empty() {
      return Self::Intersection(&schema.all_of);
    }

    match schema.primary_type() {
      Some(SchemaType::String) if schema.format.as_deref() == Some("binary") => Self::Scalar(Scalar::Binary),
      Some(SchemaType::String) => Self::Scalar(Scalar::String),
      Some(SchemaType::Integer | SchemaType::Number) => Self::Scalar(Scalar::Number),
      Some(SchemaType::Boolean) => Self::Scalar(Scalar::Boolean),
      Some(SchemaType::Null) => Self::Scalar(Scalar::Null),
      Some(SchemaType::Array) => Self::Array(schema.items.as_deref()),
      Some(SchemaType::Object) => Self::Record(schema),
      Some(SchemaType::Unknown) | None if schema.is_object_like() => Self::Record(schema),
      Some(SchemaType::Unknown) | None => Self::Unconstrained,
    }
  }
}
