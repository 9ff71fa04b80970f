use http::Method;

use super::{
  constants::{
    BODY_SUFFIX, DEFAULT_FAILURE_MESSAGE, FAILURE_SUFFIX, OPERATION_DIGIT_PREFIX, PARAM_SUFFIX, QUERY_PARAM_SUFFIX,
    RESERVED_ARGUMENT_NAMES, RESULT_SUFFIX,
  },
  identifiers::{has_separator, lower_camel, lower_first, sanitize_identifier, split_words, starts_with_digit},
  modules::path_segments,
};

/// Function name for an operation: the declared operation id when it yields
/// anything usable, otherwise one synthesized from method and path.
pub(crate) fn operation_name(operation_id: Option<&str>, method: &Method, path: &str) -> String {
  operation_id
    .and_then(name_from_operation_id)
    .unwrap_or_else(|| name_from_route(method, path))
}

pub(crate) fn name_from_operation_id(operation_id: &str) -> Option<String> {
  let trimmed = operation_id.trim();
  if trimmed.is_empty() {
    return None;
  }

  let name = if has_separator(trimmed) {
    lower_camel(&split_words(trimmed))
  } else {
    lower_first(trimmed)
  };

  (!name.is_empty()).then(|| guard_digit(name))
}

/// `GET /users/{id}/roles` becomes `getUsersByIdRoles`.
pub(crate) fn name_from_route(method: &Method, path: &str) -> String {
  let method = method.as_str().to_lowercase();
  let mut words: Vec<&str> = vec![method.as_str()];

  for segment in path_segments(path) {
    if let Some(param) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
      if !param.is_empty() {
        words.push("by");
        words.extend(split_words(param));
      }
      continue;
    }
    words.extend(split_words(segment));
  }

  guard_digit(lower_camel(&words))
}

fn guard_digit(name: String) -> String {
  if starts_with_digit(&name) {
    format!("{OPERATION_DIGIT_PREFIX}{name}")
  } else {
    name
  }
}

/// Base name for an operation's query-parameter type, before type-name sanitizing.
///
/// A leading `query` word is dropped so `queryUsers` yields `UsersQueryParam`.
/// When nothing is left the module name stands in.
pub(crate) fn query_type_hint(operation_name: &str, module: &str) -> String {
  let stripped = strip_query_word(operation_name);
  if stripped.is_empty() || stripped.eq_ignore_ascii_case("query") {
    format!("{module}{QUERY_PARAM_SUFFIX}")
  } else {
    format!("{stripped}{QUERY_PARAM_SUFFIX}")
  }
}

fn strip_query_word(name: &str) -> &str {
  match name.strip_prefix("query") {
    Some("") => "",
    Some(rest) if !rest.starts_with(|c: char| c.is_lowercase()) => rest,
    _ => name,
  }
}

pub(crate) fn body_type_hint(operation_name: &str) -> String {
  format!("{operation_name}{BODY_SUFFIX}")
}

pub(crate) fn result_type_hint(operation_name: &str) -> String {
  format!("{operation_name}{RESULT_SUFFIX}")
}

/// Local variable for a path parameter, kept clear of the `data`/`params`
/// arguments and of earlier path parameters.
pub(crate) fn path_param_variable(name: &str, taken: &[String]) -> String {
  let mut variable = sanitize_identifier(name);
  if RESERVED_ARGUMENT_NAMES.contains(&variable.as_str()) {
    variable.push_str(PARAM_SUFFIX);
  }
  while taken.iter().any(|existing| *existing == variable) {
    variable.push_str(PARAM_SUFFIX);
  }
  variable
}

/// Rejection message for a failed call, derived from the operation summary.
pub(crate) fn failure_message(summary: Option<&str>) -> String {
  let trimmed = summary.map(str::trim).unwrap_or_default();
  if trimmed.is_empty() {
    return DEFAULT_FAILURE_MESSAGE.to_string();
  }
  if trimmed.ends_with(FAILURE_SUFFIX) {
    trimmed.to_string()
  } else {
    format!("{trimmed}{FAILURE_SUFFIX}")
  }
}
