use std::fmt::Write as _;

use super::{
  constants::{INDENT, SHARED_API_MODULE},
  doc_text,
};
use crate::{
  generator::{
    converter::operations::PAGE_PARAM_TYPE,
    naming::identifiers::property_key,
    type_registry::{TypeDefinition, TypeRegistry},
  },
  spec::{AdditionalProperties, RefOr, Schema},
};

/// One entry of a module's `model/index.ts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BundleEntry {
  /// A declaration rendered in this module.
  Declaration { name: String, content: String, extends_page_param: bool },
  /// A type owned by another module and re-exported from its bundle.
  ReExport { name: String, owner_module: String },
}

impl BundleEntry {
  pub(crate) fn declaration(definition: &TypeDefinition<'_>, content: String) -> Self {
    Self::Declaration {
      name: definition.name.clone(),
      content,
      extends_page_param: definition.extends.iter().any(|parent| parent == PAGE_PARAM_TYPE),
    }
  }

  pub(crate) fn name(&self) -> &str {
    match self {
      Self::Declaration { name, .. } | Self::ReExport { name, .. } => name,
    }
  }

  pub(crate) fn is_reexport(&self) -> bool {
    matches!(self, Self::ReExport { .. })
  }

  fn text(&self) -> String {
    match self {
      Self::Declaration { content, .. } => content.clone(),
      Self::ReExport { name, owner_module } => format!("export type {{ {name} }} from '../../{owner_module}/model';\n"),
    }
  }
}

/// Joins bundle entries in name order. Returns `None` for an empty bundle.
pub(crate) fn render_model_bundle(entries: &[BundleEntry]) -> Option<String> {
  if entries.is_empty() {
    return None;
  }

  let mut sorted: Vec<&BundleEntry> = entries.iter().collect();
  sorted.sort_by(|a, b| a.name().cmp(b.name()));

  let mut out = String::new();
  let needs_page_param = sorted
    .iter()
    .any(|entry| matches!(entry, BundleEntry::Declaration { extends_page_param: true, .. }));
  if needs_page_param {
    let _ = writeln!(out, "import type {{ {PAGE_PARAM_TYPE} }} from '{SHARED_API_MODULE}';\n");
  }

  let body = sorted.iter().map(|entry| entry.text()).collect::<Vec<_>>().join("\n");
  out.push_str(&body);
  Some(out)
}

/// Renders one registered definition as an `export interface` or `export type`.
///
/// Objects with declared properties or a dictionary shape become interfaces;
/// enumerations, compositions, scalars, arrays, and component aliases become
/// type aliases.
pub(crate) fn render_type(registry: &mut TypeRegistry<'_>, definition: &TypeDefinition<'_>) -> String {
  let source = definition.schema.get();
  let schema = match source {
    RefOr::Ref { description, .. } => {
      let target = registry.type_expr(Some(source));
      let description = definition.description.as_deref().or(description.as_deref());
      return format_alias(&definition.name, &target, description);
    }
    RefOr::Item(schema) => schema,
  };

  let description = doc_text(definition.description.as_deref()).or_else(|| doc_text(schema.description.as_deref()));
  if renders_as_alias(schema) {
    let expr = registry.type_expr(Some(source));
    return format_alias(&definition.name, &expr, description.as_deref());
  }
  format_interface(registry, definition, schema, description.as_deref())
}

fn renders_as_alias(schema: &Schema) -> bool {
  !schema.enum_values.is_empty() || schema.has_composition() || !schema.is_object_like()
}

fn format_alias(name: &str, expr: &str, description: Option<&str>) -> String {
  let mut out = String::new();
  if let Some(doc) = doc_text(description) {
    let _ = writeln!(out, "/** {doc} */");
  }
  let _ = writeln!(out, "export type {name} = {expr};");
  out
}

fn format_interface(
  registry: &mut TypeRegistry<'_>,
  definition: &TypeDefinition<'_>,
  schema: &Schema,
  description: Option<&str>,
) -> String {
  let mut out = String::new();
  if let Some(doc) = description {
    let _ = writeln!(out, "/** {doc} */");
  }

  let extends = if definition.extends.is_empty() {
    String::new()
  } else {
    format!(" extends {}", definition.extends.join(", "))
  };
  let _ = writeln!(out, "export interface {}{extends} {{", definition.name);

  let policy = registry.field_policy(&definition.base_name, schema);
  for (name, property) in policy.ordered_properties(schema) {
    if let Some(doc) = doc_text(property_description(property)) {
      let _ = writeln!(out, "{INDENT}/** {doc} */");
    }
    let optional = if policy.is_optional(name, schema) { "?" } else { "" };
    let field_type = registry.type_expr_at(Some(property), 1);
    let _ = writeln!(out, "{INDENT}{}{optional}: {field_type};", property_key(name));
  }

  if schema.properties.is_empty() {
    match &schema.additional_properties {
      Some(AdditionalProperties::Schema(values)) => {
        let value_type = registry.type_expr_at(Some(values), 1);
        let _ = writeln!(out, "{INDENT}[key: string]: {value_type};");
      }
      Some(AdditionalProperties::Allowed(true)) => {
        let _ = writeln!(out, "{INDENT}[key: string]: any;");
      }
      Some(AdditionalProperties::Allowed(false)) | None => {}
    }
  }

  out.push_str("}\n");
  out
}

fn property_description(property: &RefOr<Schema>) -> Option<&str> {
  match property {
    RefOr::Ref { description, .. } => description.as_deref(),
    RefOr::Item(schema) => schema.description.as_deref(),
  }
}
