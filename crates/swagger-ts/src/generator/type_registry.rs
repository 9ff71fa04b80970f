use std::{
  collections::{BTreeMap, BTreeSet, HashSet},
  rc::Rc,
};

use indexmap::IndexMap;
use itertools::Itertools;
use strum::Display;

use super::{
  converter::FieldOptionalityPolicy,
  errors::GenerateError,
  metrics::GenerationWarning,
  naming::identifiers::{ensure_unique, sanitize_type_name},
};
use crate::{
  optionality::OptionalityIndex,
  spec::{AdditionalProperties, ApiSpec, RefOr, Schema},
  utils::parse_schema_ref_path,
};

/// Where a definition's schema lives: borrowed from the document, or built
/// during resolution (query-parameter objects).
#[derive(Debug, Clone)]
pub(crate) enum SchemaSource<'a> {
  Borrowed(&'a RefOr<Schema>),
  Owned(Rc<RefOr<Schema>>),
}

impl SchemaSource<'_> {
  pub(crate) fn get(&self) -> &RefOr<Schema> {
    match self {
      Self::Borrowed(schema) => schema,
      Self::Owned(schema) => schema,
    }
  }
}

impl<'a> From<&'a RefOr<Schema>> for SchemaSource<'a> {
  fn from(schema: &'a RefOr<Schema>) -> Self {
    Self::Borrowed(schema)
  }
}

impl From<Schema> for SchemaSource<'_> {
  fn from(schema: Schema) -> Self {
    Self::Owned(Rc::new(RefOr::Item(schema)))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum TypeKind {
  /// Registered from a `$ref` to a schema component.
  Named,
  /// Synthesized for an operation's query, body, or result.
  Inline,
}

#[derive(Debug, Clone)]
pub(crate) struct TypeDefinition<'a> {
  pub name: String,
  /// Sanitized name before any collision suffix; optionality candidates are keyed by it.
  pub base_name: String,
  pub schema: SchemaSource<'a>,
  pub description: Option<String>,
  pub kind: TypeKind,
  pub extends: Vec<String>,
}

/// Per-module table of emitted type names.
///
/// Component refs are memoized so each maps to exactly one name; every new
/// name passes through [`ensure_unique`] so the table never holds duplicates.
#[derive(Debug)]
pub(crate) struct TypeRegistry<'a> {
  spec: &'a ApiSpec,
  definitions: IndexMap<String, TypeDefinition<'a>>,
  ref_names: BTreeMap<String, String>,
  used_names: BTreeSet<String>,
  optionality: Option<&'a OptionalityIndex>,
  warnings: Vec<GenerationWarning>,
}

impl<'a> TypeRegistry<'a> {
  pub(crate) fn new(spec: &'a ApiSpec) -> Self {
    Self {
      spec,
      definitions: IndexMap::new(),
      ref_names: BTreeMap::new(),
      used_names: BTreeSet::new(),
      optionality: None,
      warnings: Vec::new(),
    }
  }

  #[must_use]
  pub(crate) fn with_optionality(mut self, optionality: Option<&'a OptionalityIndex>) -> Self {
    self.optionality = optionality;
    self
  }

  pub(crate) const fn spec(&self) -> &'a ApiSpec {
    self.spec
  }

  /// Returns the type name for a schema component reference, registering it on first use.
  pub(crate) fn register_ref(&mut self, ref_path: &str) -> Result<String, GenerateError> {
    if ref_path.is_empty() {
      return Err(GenerateError::EmptyReference);
    }
    if let Some(name) = self.ref_names.get(ref_path) {
      return Ok(name.clone());
    }

    let component = parse_schema_ref_path(ref_path).ok_or_else(|| GenerateError::InvalidReference(ref_path.to_string()))?;
    let schema = self
      .spec
      .schema_component(ref_path)
      .ok_or_else(|| GenerateError::UnresolvedReference(ref_path.to_string()))?;

    let short_name = component.rsplit('.').next().unwrap_or(component);
    let base_name = sanitize_type_name(short_name);
    let name = self.claim_name(&base_name);
    self.ref_names.insert(ref_path.to_string(), name.clone());
    self.insert(TypeDefinition {
      name: name.clone(),
      base_name,
      schema: SchemaSource::Borrowed(schema),
      description: None,
      kind: TypeKind::Named,
      extends: Vec::new(),
    });

    Ok(name)
  }

  pub(crate) fn register_inline(
    &mut self,
    hint: &str,
    schema: impl Into<SchemaSource<'a>>,
    description: Option<&str>,
  ) -> String {
    self.register_inline_with_extends(hint, schema, description, &[])
  }

  pub(crate) fn register_inline_with_extends(
    &mut self,
    hint: &str,
    schema: impl Into<SchemaSource<'a>>,
    description: Option<&str>,
    extends: &[&str],
  ) -> String {
    let base_name = sanitize_type_name(hint);
    let name = self.claim_name(&base_name);
    self.insert(TypeDefinition {
      name: name.clone(),
      base_name,
      schema: schema.into(),
      description: description.map(String::from),
      kind: TypeKind::Inline,
      extends: extends.iter().map(|parent| (*parent).to_string()).unique().collect(),
    });
    name
  }

  fn claim_name(&mut self, base: &str) -> String {
    let name = ensure_unique(base, &self.used_names);
    self.used_names.insert(name.clone());
    name
  }

  fn insert(&mut self, definition: TypeDefinition<'a>) {
    self.definitions.entry(definition.name.clone()).or_insert(definition);
  }

  pub(crate) fn contains(&self, name: &str) -> bool {
    self.definitions.contains_key(name)
  }

  #[cfg(test)]
  pub(crate) fn get(&self, name: &str) -> Option<&TypeDefinition<'a>> {
    self.definitions.get(name)
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.definitions.len()
  }

  #[cfg(test)]
  pub(crate) fn is_empty(&self) -> bool {
    self.definitions.is_empty()
  }

  /// All definitions, ordered by name.
  pub(crate) fn definitions(&self) -> Vec<&TypeDefinition<'a>> {
    self.definitions.values().sorted_by(|a, b| a.name.cmp(&b.name)).collect()
  }

  /// Follows `$ref` hops to the inline schema they end at.
  pub(crate) fn resolve_schema<'s>(&self, schema: &'s RefOr<Schema>) -> Option<&'s Schema>
  where
    'a: 's,
  {
    self.spec.resolve_schema(schema)
  }

  pub(crate) fn record_warning(&mut self, warning: GenerationWarning) {
    if !self.warnings.contains(&warning) {
      self.warnings.push(warning);
    }
  }

  pub(crate) fn take_warnings(&mut self) -> Vec<GenerationWarning> {
    std::mem::take(&mut self.warnings)
  }

  /// Field policy for a named object: the best-matching external candidate
  /// when an optionality index is attached, the schema's `required` list otherwise.
  pub(crate) fn field_policy(&self, type_name: &str, schema: &Schema) -> FieldOptionalityPolicy<'a> {
    let candidate = self
      .optionality
      .and_then(|index| index.best_candidate(type_name, schema.properties.keys().map(String::as_str)));
    FieldOptionalityPolicy::new(candidate)
  }

  /// Registers every component reachable from the current definitions.
  ///
  /// Repeats until a pass adds nothing. Visited refs and visited inline schema
  /// nodes are tracked across passes, so cyclic graphs terminate. References
  /// that fail to resolve are skipped here and surface when rendered.
  pub(crate) fn expand_references(&mut self) {
    let mut visited_refs = HashSet::new();
    let mut visited_nodes = HashSet::new();

    loop {
      let before = self.definitions.len();
      let sources: Vec<SchemaSource<'a>> = self.definitions.values().map(|def| def.schema.clone()).collect();
      for source in &sources {
        self.walk(source.get(), &mut visited_refs, &mut visited_nodes);
      }
      if self.definitions.len() == before {
        return;
      }
    }
  }

  fn walk(
    &mut self,
    schema: &RefOr<Schema>,
    visited_refs: &mut HashSet<String>,
    visited_nodes: &mut HashSet<*const Schema>,
  ) {
    let schema = match schema {
      RefOr::Ref { ref_path, .. } => {
        if !visited_refs.insert(ref_path.clone()) {
          return;
        }
        let _ = self.register_ref(ref_path);
        let spec = self.spec;
        if let Some(target) = spec.schema_component(ref_path) {
          self.walk(target, visited_refs, visited_nodes);
        }
        return;
      }
      RefOr::Item(schema) => schema,
    };

    if !visited_nodes.insert(std::ptr::from_ref(schema)) {
      return;
    }

    for child in schema.all_of.iter().chain(&schema.one_of).chain(&schema.any_of) {
      self.walk(child, visited_refs, visited_nodes);
    }
    if let Some(not) = &schema.not {
      self.walk(not, visited_refs, visited_nodes);
    }
    if let Some(items) = &schema.items {
      self.walk(items, visited_refs, visited_nodes);
    }
    for property in schema.properties.values() {
      self.walk(property, visited_refs, visited_nodes);
    }
    if let Some(AdditionalProperties::Schema(additional)) = &schema.additional_properties {
      self.walk(additional, visited_refs, visited_nodes);
    }
  }
}
