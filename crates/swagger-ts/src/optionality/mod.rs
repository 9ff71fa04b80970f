//! Externally supplied field optionality, keyed by generated type name.
//!
//! Backend struct declarations often know better than the API document which
//! fields may be omitted. A type may have several candidate declarations with
//! the same name; the one sharing the most field names with the schema wins.

pub mod go_source;

use std::collections::BTreeMap;

pub use go_source::{GoSourceOptions, scan_go_sources};

/// One candidate declaration: field optionality flags plus declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptionality {
  pub fields: BTreeMap<String, bool>,
  pub field_order: Vec<String>,
}

impl FieldOptionality {
  pub fn insert(&mut self, name: impl Into<String>, optional: bool) {
    let name = name.into();
    if !self.fields.contains_key(&name) {
      self.field_order.push(name.clone());
    }
    self.fields.insert(name, optional);
  }

  pub fn knows(&self, name: &str) -> bool {
    self.fields.contains_key(name) || self.field_order.iter().any(|field| field == name)
  }

  /// `None` when the field is not declared by this candidate.
  pub fn is_optional(&self, name: &str) -> Option<bool> {
    self.fields.get(name).copied()
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionalityIndex {
  candidates: BTreeMap<String, Vec<FieldOptionality>>,
}

impl OptionalityIndex {
  pub fn insert(&mut self, type_name: impl Into<String>, candidate: FieldOptionality) {
    self.candidates.entry(type_name.into()).or_default().push(candidate);
  }

  pub fn candidates(&self, type_name: &str) -> &[FieldOptionality] {
    self.candidates.get(type_name).map_or(&[], Vec::as_slice)
  }

  pub fn type_count(&self) -> usize {
    self.candidates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.candidates.is_empty()
  }

  /// Picks the candidate that knows the most of the given property names.
  ///
  /// Ties keep the earliest candidate; a best score of zero selects nothing.
  pub fn best_candidate<'p>(
    &self,
    type_name: &str,
    property_names: impl IntoIterator<Item = &'p str> + Clone,
  ) -> Option<&FieldOptionality> {
    let mut best: Option<(&FieldOptionality, usize)> = None;
    for candidate in self.candidates(type_name) {
      let score = property_names
        .clone()
        .into_iter()
        .filter(|name| candidate.knows(name))
        .count();
      if score > best.map_or(0, |(_, top)| top) {
        best = Some((candidate, score));
      }
    }
    best.map(|(candidate, _)| candidate)
  }
}
