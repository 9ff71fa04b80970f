/// Component tables an internal `$ref` may point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
  Schemas,
  Parameters,
  RequestBodies,
  Responses,
}

impl ComponentKind {
  const fn prefix(self) -> &'static str {
    match self {
      Self::Schemas => "#/components/schemas/",
      Self::Parameters => "#/components/parameters/",
      Self::RequestBodies => "#/components/requestBodies/",
      Self::Responses => "#/components/responses/",
    }
  }

  /// Swagger 2 location of the same table, when one exists.
  const fn legacy_prefix(self) -> Option<&'static str> {
    match self {
      Self::Schemas => Some("#/definitions/"),
      Self::Parameters => Some("#/parameters/"),
      Self::Responses => Some("#/responses/"),
      Self::RequestBodies => None,
    }
  }
}

/// Extracts the component name from an internal `$ref` into the given table.
///
/// Returns `None` for external documents, other tables, or an empty name.
pub fn parse_component_ref(ref_path: &str, kind: ComponentKind) -> Option<&str> {
  let name = ref_path
    .strip_prefix(kind.prefix())
    .or_else(|| kind.legacy_prefix().and_then(|prefix| ref_path.strip_prefix(prefix)))?;
  (!name.is_empty()).then_some(name)
}

/// Shorthand for [`parse_component_ref`] against the schema table.
pub fn parse_schema_ref_path(ref_path: &str) -> Option<&str> {
  parse_component_ref(ref_path, ComponentKind::Schemas)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_schema_ref_path() {
    assert_eq!(parse_schema_ref_path("#/components/schemas/User"), Some("User"));
    assert_eq!(parse_schema_ref_path("#/definitions/dto.User"), Some("dto.User"));
    assert_eq!(parse_schema_ref_path("#/components/schemas/"), None);
    assert_eq!(parse_schema_ref_path("other.yaml#/components/schemas/User"), None);
    assert_eq!(parse_schema_ref_path("#/components/responses/NotFound"), None);
  }

  #[test]
  fn test_parse_component_ref() {
    assert_eq!(
      parse_component_ref("#/components/parameters/PageSize", ComponentKind::Parameters),
      Some("PageSize")
    );
    assert_eq!(
      parse_component_ref("#/components/requestBodies/Upload", ComponentKind::RequestBodies),
      Some("Upload")
    );
    assert_eq!(
      parse_component_ref("#/responses/NotFound", ComponentKind::Responses),
      Some("NotFound")
    );
  }
}
