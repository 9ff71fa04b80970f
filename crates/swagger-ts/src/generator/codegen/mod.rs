//! Text rendering for generated TypeScript: type declarations, model
//! bundles, request functions, and index files.

pub(crate) mod client;
pub(crate) mod constants;
pub(crate) mod types;

#[cfg(test)]
mod tests;

pub(crate) use client::{render_api_header, render_api_index, render_operation};
pub(crate) use types::{BundleEntry, render_model_bundle, render_type};

/// Lines a piece of text occupies once written: newline count plus one, zero when empty.
pub(crate) fn count_lines(content: &str) -> usize {
  if content.is_empty() {
    0
  } else {
    content.matches('\n').count() + 1
  }
}

/// Single-line JSDoc text; `None` when there is nothing to say.
pub(crate) fn doc_text(text: Option<&str>) -> Option<String> {
  let text = text?.trim();
  if text.is_empty() {
    return None;
  }
  let flattened = text.split(['\r', '\n']).map(str::trim).filter(|line| !line.is_empty()).collect::<Vec<_>>();
  Some(flattened.join(" ").replace("*/", "*\\/"))
}
