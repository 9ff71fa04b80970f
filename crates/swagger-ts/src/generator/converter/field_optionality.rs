use crate::{
  optionality::FieldOptionality,
  spec::{RefOr, Schema},
};

/// Policy for deciding whether an interface property is emitted with `?`,
/// and in which order properties appear.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FieldOptionalityPolicy<'c> {
  candidate: Option<&'c FieldOptionality>,
}

impl<'c> FieldOptionalityPolicy<'c> {
  pub fn new(candidate: Option<&'c FieldOptionality>) -> Self {
    Self { candidate }
  }

  /// A property is optional when it is missing from `required`, unless an
  /// external candidate knows it, in which case only an explicit optional flag
  /// makes it optional.
  pub fn is_optional(self, prop_name: &str, parent_schema: &Schema) -> bool {
    if let Some(candidate) = self.candidate
      && candidate.knows(prop_name)
    {
      return candidate.is_optional(prop_name).unwrap_or(false);
    }
    !parent_schema.is_required(prop_name)
  }

  /// Properties in emission order: the candidate's declared order first, then
  /// the remaining names alphabetically.
  pub fn ordered_properties<'s>(self, parent_schema: &'s Schema) -> Vec<(&'s str, &'s RefOr<Schema>)> {
    let Some(candidate) = self.candidate else {
      return parent_schema
        .properties
        .iter()
        .map(|(name, schema)| (name.as_str(), schema))
        .collect();
    };

    let mut ordered: Vec<(&'s str, &'s RefOr<Schema>)> = candidate
      .field_order
      .iter()
      .filter_map(|name| parent_schema.properties.get_key_value(name))
      .map(|(name, schema)| (name.as_str(), schema))
      .collect();
    ordered.extend(
      parent_schema
        .properties
        .iter()
        .filter(|(name, _)| !candidate.field_order.contains(name))
        .map(|(name, schema)| (name.as_str(), schema)),
    );
    ordered
  }
}
