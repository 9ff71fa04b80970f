//! Return types for operations: envelope unwrapping and page-result recognition.
//!
//! Responses are assumed to follow the `{ success, data, error }` envelope. The
//! `data` payload decides the function's return type. On operations that take
//! `current` and `pageSize` query parameters, a payload shaped like
//! `{ list: T[], count }` (directly, behind a `$ref`, or assembled from `allOf`
//! members) becomes `PageResult<T>`.

use std::collections::BTreeMap;

use itertools::Itertools;

use super::type_resolver::ANY;
use crate::{
  generator::{
    ast::ReturnInfo,
    naming::{identifiers::is_identifier, operations::result_type_hint},
    type_registry::TypeRegistry,
  },
  spec::{ApiSpec, RefOr, Schema},
};

pub(crate) const PAGE_RESULT_TYPE: &str = "PageResult";

const DATA_PROPERTY: &str = "data";
const LIST_PROPERTY: &str = "list";
const COUNT_PROPERTY: &str = "count";

/// Resolves the return type of an operation along with the registered type
/// names the API file has to import for it.
pub(crate) fn resolve_return_type<'a>(
  registry: &mut TypeRegistry<'a>,
  operation_name: &str,
  response: Option<&'a RefOr<Schema>>,
  is_page_query: bool,
) -> (ReturnInfo, Vec<String>) {
  let spec = registry.spec();
  let Some(data) = extract_data_schema(spec, response) else {
    return (ReturnInfo::void(), Vec::new());
  };

  match data {
    RefOr::Ref { ref_path, .. } => {
      if is_page_query
        && let Some(target) = spec.resolve_schema(data)
        && let Some(element) = page_element(spec, target)
      {
        return page_result(registry, element);
      }
      match registry.register_ref(ref_path) {
        Ok(name) => (ReturnInfo::of(name.clone()), vec![name]),
        Err(_) => (ReturnInfo::of(ANY), Vec::new()),
      }
    }
    RefOr::Item(schema) => {
      if is_page_query && let Some(element) = page_element(spec, schema) {
        return page_result(registry, element);
      }
      if schema.is_array() {
        return array_result(registry, schema.items.as_deref());
      }
      let name = registry.register_inline(&result_type_hint(operation_name), data, None);
      (ReturnInfo::of(name.clone()), vec![name])
    }
  }
}

/// The envelope's `data` payload. An `allOf` member carrying a usable `data`
/// property wins over the schema's own. A blank payload counts as absent.
pub(crate) fn extract_data_schema<'s>(spec: &'s ApiSpec, response: Option<&'s RefOr<Schema>>) -> Option<&'s RefOr<Schema>> {
  let envelope = spec.resolve_schema(response?)?;

  envelope
    .all_of
    .iter()
    .filter_map(|member| spec.resolve_schema(member))
    .chain(std::iter::once(envelope))
    .filter_map(|schema| schema.properties.get(DATA_PROPERTY))
    .find(|data| !is_empty_schema(data))
}

fn is_empty_schema(schema: &RefOr<Schema>) -> bool {
  match schema {
    RefOr::Ref { .. } => false,
    RefOr::Item(schema) => schema.is_blank(),
  }
}

/// Page element schema for a payload, if the payload is page-shaped.
///
/// An array payload pages over its items (`None` items page over `any`); an
/// object payload needs `list` and `count` properties with `list` an array.
fn page_element<'s>(spec: &'s ApiSpec, schema: &'s Schema) -> Option<PageElement<'s>> {
  if schema.is_array() {
    return Some(PageElement(schema.items.as_deref()));
  }
  if !schema.is_object_like() && schema.all_of.is_empty() {
    return None;
  }

  let properties = merged_properties(spec, schema);
  properties.get(COUNT_PROPERTY)?;
  let list = spec.resolve_schema(properties.get(LIST_PROPERTY)?)?;
  list
    .is_array()
    .then(|| PageElement(list.items.as_deref()))
    .filter(|element| element.0.is_some())
}

#[derive(Debug, Clone, Copy)]
struct PageElement<'s>(Option<&'s RefOr<Schema>>);

/// Properties of a schema with its `allOf` members folded in. Later members
/// override earlier ones and the schema's own properties override them all.
pub(crate) fn merged_properties<'s>(spec: &'s ApiSpec, schema: &'s Schema) -> BTreeMap<&'s str, &'s RefOr<Schema>> {
  fn collect<'s>(
    spec: &'s ApiSpec,
    schema: &'s Schema,
    depth: usize,
    merged: &mut BTreeMap<&'s str, &'s RefOr<Schema>>,
  ) {
    if depth > MAX_MERGE_DEPTH {
      return;
    }
    for member in &schema.all_of {
      if let Some(member) = spec.resolve_schema(member) {
        collect(spec, member, depth + 1, merged);
      }
    }
    for (name, property) in &schema.properties {
      merged.insert(name.as_str(), property);
    }
  }

  let mut merged = BTreeMap::new();
  collect(spec, schema, 0, &mut merged);
  merged
}

const MAX_MERGE_DEPTH: usize = 16;

fn page_result<'a>(registry: &mut TypeRegistry<'a>, element: PageElement<'a>) -> (ReturnInfo, Vec<String>) {
  let element_type = registry.type_expr(element.0);
  let used = element.0.map(|items| collect_type_names(registry, items)).unwrap_or_default();
  (ReturnInfo::page(&element_type), used)
}

fn array_result<'a>(registry: &mut TypeRegistry<'a>, items: Option<&'a RefOr<Schema>>) -> (ReturnInfo, Vec<String>) {
  let element_type = registry.type_expr(items);
  let used = items.map(|items| collect_type_names(registry, items)).unwrap_or_default();
  let type_expr = if is_identifier(&element_type) {
    format!("{element_type}[]")
  } else {
    format!("Array<{element_type}>")
  };
  (ReturnInfo::of(type_expr), used)
}

/// Registered names a schema mentions directly, through array items and
/// object properties. Sorted and deduplicated.
pub(crate) fn collect_type_names<'a>(registry: &mut TypeRegistry<'a>, schema: &'a RefOr<Schema>) -> Vec<String> {
  fn walk<'a>(registry: &mut TypeRegistry<'a>, schema: &'a RefOr<Schema>, names: &mut Vec<String>) {
    match schema {
      RefOr::Ref { ref_path, .. } => {
        if let Ok(name) = registry.register_ref(ref_path) {
          names.push(name);
        }
      }
      RefOr::Item(schema) => {
        if let Some(items) = &schema.items {
          walk(registry, items, names);
        }
        for property in schema.properties.values() {
          walk(registry, property, names);
        }
      }
    }
  }

  let mut names = Vec::new();
  walk(registry, schema, &mut names);
  names.into_iter().sorted().dedup().collect()
}
