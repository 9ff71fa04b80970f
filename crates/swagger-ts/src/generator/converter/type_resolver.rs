use serde_json::Value;

use crate::{
  generator::{
    metrics::GenerationWarning,
    naming::identifiers::{escape_single_quoted, property_key},
    type_registry::TypeRegistry,
  },
  spec::{AdditionalProperties, RefOr, Schema, SchemaKind},
};

pub(crate) const ANY: &str = "any";

const UNION_SEPARATOR: &str = " | ";
const INTERSECTION_SEPARATOR: &str = " & ";
const INDENT: &str = "  ";

impl TypeRegistry<'_> {
  /// Compiles a schema into a TypeScript type expression.
  ///
  /// References are registered as they are met. A reference that cannot be
  /// registered degrades to `any` and leaves a warning behind.
  pub(crate) fn type_expr(&mut self, schema: Option<&RefOr<Schema>>) -> String {
    self.type_expr_at(schema, 0)
  }

  /// Like [`Self::type_expr`], with inline object bodies indented for `depth`.
  pub(crate) fn type_expr_at(&mut self, schema: Option<&RefOr<Schema>>, depth: usize) -> String {
    let Some(schema) = schema else {
      return ANY.to_string();
    };

    let expr = self.kind_expr(SchemaKind::of(schema), depth);
    match schema {
      RefOr::Item(inner) if inner.is_nullable() => format!("{expr} | null"),
      _ => expr,
    }
  }

  fn kind_expr(&mut self, kind: SchemaKind<'_>, depth: usize) -> String {
    match kind {
      SchemaKind::Reference(ref_path) => self.reference_expr(ref_path),
      SchemaKind::Enumeration(values) => literal_union(values),
      SchemaKind::Union(members) => self.join_members(members, UNION_SEPARATOR, depth),
      SchemaKind::Intersection(members) => self.join_members(members, INTERSECTION_SEPARATOR, depth),
      SchemaKind::Scalar(scalar) => scalar.as_ts().to_string(),
      SchemaKind::Array(None) => format!("Array<{ANY}>"),
      SchemaKind::Array(Some(items)) => format!("Array<{}>", self.type_expr_at(Some(items), depth)),
      SchemaKind::Record(schema) => self.record_expr(schema, depth),
      SchemaKind::Unconstrained => ANY.to_string(),
    }
  }

  fn reference_expr(&mut self, ref_path: &str) -> String {
    match self.register_ref(ref_path) {
      Ok(name) => name,
      Err(error) => {
        self.record_warning(GenerationWarning::UnresolvedReference {
          reference: ref_path.to_string(),
          error: error.to_string(),
        });
        ANY.to_string()
      }
    }
  }

  fn join_members(&mut self, members: &[RefOr<Schema>], separator: &str, depth: usize) -> String {
    if members.is_empty() {
      return ANY.to_string();
    }
    members
      .iter()
      .map(|member| self.type_expr_at(Some(member), depth))
      .collect::<Vec<_>>()
      .join(separator)
  }

  fn record_expr(&mut self, schema: &Schema, depth: usize) -> String {
    if schema.properties.is_empty() {
      return match &schema.additional_properties {
        Some(AdditionalProperties::Schema(values)) => {
          format!("Record<string, {}>", self.type_expr_at(Some(values), depth))
        }
        Some(AdditionalProperties::Allowed(false)) => "Record<string, never>".to_string(),
        _ => format!("Record<string, {ANY}>"),
      };
    }

    let field_indent = INDENT.repeat(depth + 1);
    let mut out = String::from("{\n");
    for (name, property) in &schema.properties {
      let optional = if schema.is_required(name) { "" } else { "?" };
      let field_type = self.type_expr_at(Some(property), depth + 1);
      out.push_str(&format!("{field_indent}{}{optional}: {field_type};\n", property_key(name)));
    }
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
    out
  }
}

/// Union of enumeration literals. Strings are single-quoted; numbers and
/// booleans appear verbatim; anything else contributes `any`.
pub(crate) fn literal_union(values: &[Value]) -> String {
  if values.is_empty() {
    return ANY.to_string();
  }
  values
    .iter()
    .map(|value| match value {
      Value::String(text) => format!("'{}'", escape_single_quoted(text)),
      Value::Number(number) => number.to_string(),
      Value::Bool(flag) => flag.to_string(),
      _ => ANY.to_string(),
    })
    .collect::<Vec<_>>()
    .join(UNION_SEPARATOR)
}
