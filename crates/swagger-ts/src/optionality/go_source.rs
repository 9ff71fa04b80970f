//! Reads `omitempty` markers from Go struct declarations.
//!
//! A field is optional exactly when its `json` tag carries `omitempty`. Fields
//! tagged `json:"-"`, unexported fields, and embedded fields are skipped.
//! The reader is line oriented and understands gofmt-formatted sources:
//! `type X struct {` blocks, grouped `type ( ... )` declarations, and nested
//! anonymous structs whose tag sits on the closing brace line.

use std::{
  collections::BTreeSet,
  path::{Path, PathBuf},
  sync::LazyLock,
};

use anyhow::Context;
use regex::Regex;
use walkdir::{DirEntry, WalkDir};

use super::{FieldOptionality, OptionalityIndex};
use crate::generator::naming::identifiers::sanitize_type_name;

/// Directory names scanned when no include list is given.
pub const DEFAULT_INCLUDE_DIRS: &[&str] = &["schema", "fiberx"];

static TYPE_STRUCT_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^type\s+([A-Za-z_]\w*)(?:\[[^\]]*\])?\s+struct\s*\{(.*)$").unwrap());
static TYPE_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^type\s*\($").unwrap());
static GROUPED_STRUCT_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([A-Za-z_]\w*)(?:\[[^\]]*\])?\s+struct\s*\{(.*)$").unwrap());
static FIELD_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)*)\s+(\S.*)$").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]*)`\s*$").unwrap());
static JSON_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?:^|\s)json:"([^"]*)""#).unwrap());

#[derive(Debug, Clone)]
pub struct GoSourceOptions {
  pub root: PathBuf,
  pub include_dirs: Vec<String>,
}

impl GoSourceOptions {
  pub fn new(root: impl Into<PathBuf>, include_dirs: impl IntoIterator<Item = String>) -> Self {
    Self {
      root: root.into(),
      include_dirs: include_dirs.into_iter().collect(),
    }
  }

  fn include_set(&self) -> BTreeSet<&str> {
    let explicit: BTreeSet<&str> = self
      .include_dirs
      .iter()
      .map(|dir| dir.trim())
      .filter(|dir| !dir.is_empty())
      .collect();
    if explicit.is_empty() {
      DEFAULT_INCLUDE_DIRS.iter().copied().collect()
    } else {
      explicit
    }
  }
}

/// Walks the source tree and indexes every struct declaration by sanitized type name.
pub fn scan_go_sources(options: &GoSourceOptions) -> anyhow::Result<OptionalityIndex> {
  if options.root.as_os_str().is_empty() {
    anyhow::bail!("Go source root is empty");
  }

  let include = options.include_set();
  let mut index = OptionalityIndex::default();

  for path in collect_source_files(&options.root, &include)? {
    let source = std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    for (name, candidate) in parse_go_structs(&source) {
      index.insert(sanitize_type_name(&name), candidate);
    }
  }

  Ok(index)
}

fn collect_source_files(root: &Path, include: &BTreeSet<&str>) -> anyhow::Result<Vec<PathBuf>> {
  let mut files = Vec::new();
  let walker = WalkDir::new(root)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

  for entry in walker {
    let entry = entry.with_context(|| format!("failed to scan Go sources under {}", root.display()))?;
    if !entry.file_type().is_file() {
      continue;
    }
    let path = entry.path();
    let file_name = entry.file_name().to_string_lossy();
    if !file_name.ends_with(".go") || file_name.ends_with("_test.go") {
      continue;
    }
    if is_included(root, path, include) {
      files.push(path.to_path_buf());
    }
  }

  Ok(files)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
  if !entry.file_type().is_dir() {
    return false;
  }
  let name = entry.file_name().to_string_lossy();
  name == "vendor" || name.starts_with('.')
}

fn is_included(root: &Path, path: &Path, include: &BTreeSet<&str>) -> bool {
  path
    .strip_prefix(root)
    .map(|relative| {
      relative
        .components()
        .any(|component| include.contains(component.as_os_str().to_string_lossy().as_ref()))
    })
    .unwrap_or(false)
}

/// Extracts `(type name, field optionality)` for each top-level struct in a Go file.
pub fn parse_go_structs(source: &str) -> Vec<(String, FieldOptionality)> {
  let cleaned = strip_comments(source);
  let lines: Vec<&str> = cleaned.lines().collect();
  let mut structs = Vec::new();
  let mut depth = 0i32;
  let mut in_group = false;
  let mut cursor = 0;

  while cursor < lines.len() {
    let line = lines[cursor].trim();
    cursor += 1;

    if depth == 0 && !in_group && TYPE_GROUP_RE.is_match(line) {
      in_group = true;
      continue;
    }
    if depth == 0 && in_group && line == ")" {
      in_group = false;
      continue;
    }

    let header = match (depth, in_group) {
      (0, false) => TYPE_STRUCT_RE.captures(line),
      (0, true) => GROUPED_STRUCT_RE.captures(line),
      _ => None,
    };
    if let Some(caps) = header {
      let (fields, consumed) = parse_struct_body(&caps[2], &lines[cursor..]);
      cursor += consumed;
      structs.push((caps[1].to_string(), fields));
      continue;
    }

    depth = (depth + brace_delta(line)).max(0);
  }

  structs
}

/// Consumes lines up to the brace closing the struct opened on the header line.
fn parse_struct_body(header_rest: &str, lines: &[&str]) -> (FieldOptionality, usize) {
  let mut fields = FieldOptionality::default();
  let mut depth = 1 + brace_delta(header_rest);
  if depth <= 0 {
    let body = closing_brace(header_rest).map_or(header_rest, |end| &header_rest[..end]);
    for field in split_inline_fields(body) {
      record_field(&mut fields, field.trim());
    }
    return (fields, 0);
  }

  let mut nested_names: Option<Vec<String>> = None;
  let mut consumed = 0;

  for raw in lines {
    consumed += 1;
    let line = raw.trim();
    let delta = brace_delta(line);

    if depth == 1 {
      if line.starts_with('}') && delta < 0 {
        return (fields, consumed);
      }
      if delta > 0 {
        nested_names = FIELD_RE.captures(line).map(|caps| split_names(&caps[1]));
      } else {
        record_field(&mut fields, line);
      }
    } else if depth + delta == 1
      && let Some(names) = nested_names.take()
    {
      let tag = TAG_RE.captures(line).map(|caps| caps[1].to_string());
      for name in names {
        record_name(&mut fields, &name, tag.as_deref());
      }
    }

    depth += delta;
    if depth <= 0 {
      return (fields, consumed);
    }
  }

  (fields, consumed)
}

fn record_field(fields: &mut FieldOptionality, line: &str) {
  if line.is_empty() {
    return;
  }
  let (declaration, tag) = match TAG_RE.captures(line) {
    Some(caps) => {
      let start = caps.get(0).map_or(line.len(), |m| m.start());
      (line[..start].trim(), Some(caps[1].to_string()))
    }
    None => (line, None),
  };

  let Some(caps) = FIELD_RE.captures(declaration) else {
    return;
  };
  for name in split_names(&caps[1]) {
    record_name(fields, &name, tag.as_deref());
  }
}

fn split_names(names: &str) -> Vec<String> {
  names
    .split(',')
    .map(str::trim)
    .filter(|name| !name.is_empty())
    .map(String::from)
    .collect()
}

fn record_name(fields: &mut FieldOptionality, field_name: &str, tag: Option<&str>) {
  if !field_name.starts_with(|c: char| c.is_ascii_uppercase()) {
    return;
  }
  if let Some((json_name, optional)) = resolve_json_field(field_name, tag) {
    fields.insert(json_name, optional);
  }
}

/// Wire name and optionality for one exported field, or `None` when `json:"-"`.
fn resolve_json_field(field_name: &str, tag: Option<&str>) -> Option<(String, bool)> {
  let json_tag = tag
    .and_then(|tag| JSON_TAG_RE.captures(tag))
    .map(|caps| caps[1].trim().to_string())
    .unwrap_or_default();
  if json_tag.is_empty() {
    return Some((field_name.to_string(), false));
  }

  let mut parts = json_tag.split(',');
  let explicit = parts.next().map(str::trim).unwrap_or_default();
  if explicit == "-" {
    return None;
  }
  let name = if explicit.is_empty() { field_name } else { explicit };
  let optional = parts.any(|option| option.trim() == "omitempty");
  Some((name.to_string(), optional))
}

/// Characters of `line` outside string, rune, and raw-string literals, with their byte offsets.
fn unquoted(line: &str) -> impl Iterator<Item = (usize, char)> + '_ {
  let mut quote: Option<char> = None;
  let mut escaped = false;
  line.char_indices().filter(move |&(_, ch)| {
    if let Some(open) = quote {
      if escaped {
        escaped = false;
      } else if ch == '\\' && open != '`' {
        escaped = true;
      } else if ch == open {
        quote = None;
      }
      return false;
    }
    if matches!(ch, '"' | '\'' | '`') {
      quote = Some(ch);
      return false;
    }
    true
  })
}

/// Net `{` minus `}` outside literals.
fn brace_delta(line: &str) -> i32 {
  unquoted(line)
    .map(|(_, ch)| match ch {
      '{' => 1,
      '}' => -1,
      _ => 0,
    })
    .sum()
}

/// Offset of the `}` closing a brace opened just before `text`.
fn closing_brace(text: &str) -> Option<usize> {
  let mut depth = 1;
  for (idx, ch) in unquoted(text) {
    match ch {
      '{' => depth += 1,
      '}' => {
        depth -= 1;
        if depth == 0 {
          return Some(idx);
        }
      }
      _ => {}
    }
  }
  None
}

/// Field declarations of a single-line struct body, separated by top-level `;`.
fn split_inline_fields(body: &str) -> Vec<&str> {
  let mut parts = Vec::new();
  let mut depth = 0;
  let mut start = 0;
  for (idx, ch) in unquoted(body) {
    match ch {
      '{' => depth += 1,
      '}' => depth -= 1,
      ';' if depth == 0 => {
        parts.push(&body[start..idx]);
        start = idx + 1;
      }
      _ => {}
    }
  }
  parts.push(&body[start..]);
  parts
}

/// Drops `//` and `/* */` comments, leaving literals intact.
fn strip_comments(source: &str) -> String {
  let mut out = String::with_capacity(source.len());
  let mut chars = source.chars().peekable();
  let mut quote: Option<char> = None;
  let mut escaped = false;

  while let Some(ch) = chars.next() {
    if let Some(open) = quote {
      out.push(ch);
      if escaped {
        escaped = false;
      } else if ch == '\\' && open != '`' {
        escaped = true;
      } else if ch == open || (ch == '\n' && open != '`') {
        quote = None;
      }
      continue;
    }

    match ch {
      '"' | '\'' | '`' => {
        quote = Some(ch);
        out.push(ch);
      }
      '/' if chars.peek() == Some(&'/') => {
        for next in chars.by_ref() {
          if next == '\n' {
            out.push('\n');
            break;
          }
        }
      }
      '/' if chars.peek() == Some(&'*') => {
        chars.next();
        let mut prev = '\0';
        for next in chars.by_ref() {
          if next == '\n' {
            out.push('\n');
          }
          if prev == '*' && next == '/' {
            break;
          }
          prev = next;
        }
      }
      _ => out.push(ch),
    }
  }

  out
}
