use std::sync::LazyLock;

use regex::Regex;

use super::{
  constants::{FALLBACK_MODULE, MODULE_DIGIT_PREFIX},
  identifiers::{split_words, starts_with_digit, upper_first},
};

static VERSION_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^v\d+([a-zA-Z0-9_-]+)?$").unwrap());

pub(crate) fn path_segments(path: &str) -> impl Iterator<Item = &str> {
  path.split('/').filter(|segment| !segment.is_empty())
}

/// Picks the output module for a route.
///
/// `/api/<version>/<name>/...` groups under `<name>`; every other route groups
/// under its first segment.
pub(crate) fn module_name_for_path(path: &str) -> String {
  let segments: Vec<&str> = path_segments(path).collect();
  match segments.as_slice() {
    [] => FALLBACK_MODULE.to_string(),
    ["api", version, name, ..] if VERSION_SEGMENT_RE.is_match(version) => sanitize_path_segment(name),
    [first, ..] => sanitize_path_segment(first),
  }
}

/// Lower-camel module name from one path segment.
pub(crate) fn sanitize_path_segment(segment: &str) -> String {
  let cleaned: String = segment
    .chars()
    .map(|ch| {
      if ch.is_alphanumeric() || ch == '-' || ch == '_' {
        ch.to_lowercase().next().unwrap_or(ch)
      } else {
        '-'
      }
    })
    .collect();

  let mut module = String::new();
  for (idx, word) in split_words(&cleaned).into_iter().enumerate() {
    if idx == 0 {
      module.push_str(word);
    } else {
      module.push_str(&upper_first(word));
    }
  }

  if module.is_empty() {
    return FALLBACK_MODULE.to_string();
  }
  if starts_with_digit(&module) {
    return format!("{MODULE_DIGIT_PREFIX}{module}");
  }
  module
}
