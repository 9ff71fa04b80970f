use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use super::constants::{FALLBACK_IDENTIFIER, FALLBACK_TYPE_NAME};

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Splits on every run of non-ASCII-alphanumeric characters, dropping empty pieces.
pub(crate) fn split_words(input: &str) -> Vec<&str> {
  NON_ALNUM_RE.split(input).filter(|word| !word.is_empty()).collect()
}

pub(crate) fn has_separator(input: &str) -> bool {
  NON_ALNUM_RE.is_match(input)
}

pub(crate) fn is_identifier(input: &str) -> bool {
  IDENTIFIER_RE.is_match(input)
}

pub(crate) fn starts_with_digit(input: &str) -> bool {
  input.starts_with(|c: char| c.is_ascii_digit())
}

pub(crate) fn upper_first(input: &str) -> String {
  let mut chars = input.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

pub(crate) fn lower_first(input: &str) -> String {
  let mut chars = input.chars();
  match chars.next() {
    Some(first) => first.to_lowercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// Joins words as lowerCamelCase: the first word fully lowercased, the rest
/// with an uppercased first letter and their remaining case kept.
pub(crate) fn lower_camel<S: AsRef<str>>(words: &[S]) -> String {
  let mut out = String::new();
  for (idx, word) in words.iter().map(AsRef::as_ref).enumerate() {
    if word.is_empty() {
      continue;
    }
    if idx == 0 {
      out.push_str(&word.to_lowercase());
    } else {
      out.push_str(&upper_first(word));
    }
  }
  out
}

/// Converts a component or hint name into a PascalCase type name.
///
/// Dots separate namespaces (`dto.UserInfo` becomes `DtoUserInfo`). Names
/// that come out empty or digit-leading get the `Model` prefix.
pub(crate) fn sanitize_type_name(name: &str) -> String {
  let spaced = name.replace('.', " ");
  let joined: String = split_words(&spaced).into_iter().map(upper_first).collect();

  if joined.is_empty() {
    return FALLBACK_TYPE_NAME.to_string();
  }
  if starts_with_digit(&joined) {
    return format!("{FALLBACK_TYPE_NAME}{joined}");
  }
  joined
}

/// Makes a value identifier safe for generated code.
///
/// Valid identifiers pass through untouched; otherwise every disallowed run
/// becomes `_`, surrounding underscores are trimmed, and digit-leading or
/// empty results get a `value` prefix.
pub(crate) fn sanitize_identifier(name: &str) -> String {
  if is_identifier(name) {
    return name.to_string();
  }

  let replaced = NON_ALNUM_RE.replace_all(name, "_");
  let trimmed = replaced.trim_matches('_');

  if trimmed.is_empty() {
    return FALLBACK_IDENTIFIER.to_string();
  }
  if starts_with_digit(trimmed) {
    return format!("{FALLBACK_IDENTIFIER}_{trimmed}");
  }
  trimmed.to_string()
}

/// Ensures a name is unique within a set of used names, appending a numeric suffix if needed.
pub(crate) fn ensure_unique(base_name: &str, used_names: &BTreeSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  let mut i = 2;
  loop {
    let new_name = format!("{base_name}{i}");
    if !used_names.contains(&new_name) {
      return new_name;
    }
    i += 1;
  }
}

/// Escapes a value for a single-quoted TypeScript literal. Newlines collapse to spaces.
pub(crate) fn escape_single_quoted(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for ch in value.chars() {
    match ch {
      '\\' => out.push_str("\\\\"),
      '\'' => out.push_str("\\'"),
      '\n' => out.push(' '),
      '\r' => {}
      other => out.push(other),
    }
  }
  out
}

/// Object keys that are not plain identifiers are emitted quoted.
pub(crate) fn property_key(name: &str) -> String {
  if is_identifier(name) {
    name.to_string()
  } else {
    format!("'{}'", escape_single_quoted(name))
  }
}
