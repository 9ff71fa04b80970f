//! Output planning for the TypeScript client.
//!
//! The `Orchestrator` walks the extracted operations module by module, in
//! module-name order. Each module gets a fresh [`TypeRegistry`] that lives only
//! while that module is resolved and rendered. The result is a list of files
//! relative to the output root; writing them is left to the caller.
//!
//! ## Usage
//!
//! ```ignore
//! let spec = ApiSpec::from_value(document)?;
//! let options = GeneratorOptions::builder().dedupe_cross_module(true).build();
//! let output = Orchestrator::new(&spec, options).generate()?;
//!
//! for file in &output.files {
//!   println!("{}: {} bytes", file.path.display(), file.content.len());
//! }
//! ```

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use anyhow::Context;

use super::{
  codegen::{
    BundleEntry, constants::ROOT_INDEX_CONTENT, count_lines, render_api_header, render_api_index, render_model_bundle,
    render_operation, render_type,
  },
  converter::OperationConverter,
  metrics::GenerationStats,
  operation_registry::{OperationRegistry, RawOperation},
  type_registry::{TypeDefinition, TypeKind, TypeRegistry},
};
use crate::{optionality::OptionalityIndex, spec::ApiSpec};

/// Line budget of one API file, header included.
pub const MAX_LINES_PER_FILE: usize = 500;

const INDEX_FILE: &str = "index.ts";
const MODEL_DIR: &str = "model";

#[derive(Debug, Clone, Copy, Default, bon::Builder)]
pub struct GeneratorOptions<'o> {
  /// Re-export identical named types from the first module that declares them.
  #[builder(default)]
  pub dedupe_cross_module: bool,
  /// Externally inferred field optionality; `None` keeps the schema's `required` rule.
  pub optionality: Option<&'o OptionalityIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  /// Relative to the output root.
  pub path: PathBuf,
  pub content: String,
}

impl GeneratedFile {
  fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      content: content.into(),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct GeneratedOutput {
  /// Root index first, then each module's model bundle and API files.
  pub files: Vec<GeneratedFile>,
  /// Module names in generation order.
  pub modules: Vec<String>,
  pub stats: GenerationStats,
}

impl GeneratedOutput {
  pub fn file(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
    let path = path.as_ref();
    self.files.iter().find(|file| file.path == path)
  }
}

/// Declarations already emitted by earlier modules, keyed by type name and
/// exact declaration text, mapped to the first module that owns them.
type SharedDeclarations = HashMap<(String, String), String>;

struct ModuleOutput {
  files: Vec<GeneratedFile>,
  /// Named declarations this module owns, offered to later modules.
  declarations: Vec<(String, String)>,
}

pub struct Orchestrator<'a> {
  spec: &'a ApiSpec,
  options: GeneratorOptions<'a>,
}

impl<'a> Orchestrator<'a> {
  pub fn new(spec: &'a ApiSpec, options: GeneratorOptions<'a>) -> Self {
    Self { spec, options }
  }

  /// Resolves and renders every module.
  ///
  /// # Errors
  ///
  /// Fails when the document has no paths, or when an operation's body is a
  /// reference that cannot be resolved. Nothing is returned for modules that
  /// rendered before the failure.
  pub fn generate(&self) -> anyhow::Result<GeneratedOutput> {
    let mut registry = OperationRegistry::from_spec(self.spec)?;
    let mut stats = GenerationStats::default();
    stats.record_warnings(registry.take_warnings());

    let mut files = vec![GeneratedFile::new(INDEX_FILE, ROOT_INDEX_CONTENT)];
    let mut modules = Vec::new();
    let mut shared = SharedDeclarations::new();

    for (module, operations) in registry.modules() {
      let output = self
        .generate_module(module, &operations, &shared, &mut stats)
        .with_context(|| format!("Failed to generate module '{module}'"))?;

      if self.options.dedupe_cross_module {
        for declaration in output.declarations {
          shared.entry(declaration).or_insert_with(|| module.to_string());
        }
      }
      files.extend(output.files);
      modules.push(module.to_string());
    }

    Ok(GeneratedOutput { files, modules, stats })
  }

  fn generate_module(
    &self,
    module: &str,
    operations: &[&RawOperation<'a>],
    shared: &SharedDeclarations,
    stats: &mut GenerationStats,
  ) -> anyhow::Result<ModuleOutput> {
    let mut registry = TypeRegistry::new(self.spec).with_optionality(self.options.optionality);
    let converted = OperationConverter::new(&mut registry).convert_all(operations.iter().copied())?;
    registry.expand_references();

    let definitions: Vec<TypeDefinition<'a>> = registry.definitions().into_iter().cloned().collect();
    let mut entries = Vec::with_capacity(definitions.len());
    let mut declarations = Vec::new();

    for definition in &definitions {
      let content = render_type(&mut registry, definition);
      if definition.kind != TypeKind::Named {
        entries.push(BundleEntry::declaration(definition, content));
        continue;
      }

      let key = (definition.name.clone(), content);
      match shared.get(&key) {
        Some(owner) if self.options.dedupe_cross_module => {
          entries.push(BundleEntry::ReExport {
            name: key.0,
            owner_module: owner.clone(),
          });
        }
        _ => {
          let (name, content) = key;
          entries.push(BundleEntry::declaration(definition, content.clone()));
          declarations.push((name, content));
        }
      }
    }

    let module_dir = PathBuf::from(module);
    let mut files = Vec::new();
    let reexported = entries.iter().filter(|entry| entry.is_reexport()).count();
    stats.record_types(entries.len() - reexported, reexported);
    if let Some(bundle) = render_model_bundle(&entries) {
      files.push(GeneratedFile::new(module_dir.join(MODEL_DIR).join(INDEX_FILE), bundle));
    }

    let header = render_api_header(&converted.used_types, converted.uses_page_result);
    let rendered: Vec<String> = converted.operations.iter().map(render_operation).collect();
    let parts = split_operations(&header, &rendered, MAX_LINES_PER_FILE);

    if let [single] = parts.as_slice() {
      files.push(GeneratedFile::new(module_dir.join(INDEX_FILE), single.clone()));
    } else {
      for (index, part) in parts.iter().enumerate() {
        files.push(GeneratedFile::new(module_dir.join(format!("api_{}.ts", index + 1)), part.clone()));
      }
      files.push(GeneratedFile::new(module_dir.join(INDEX_FILE), render_api_index(parts.len())));
    }

    stats.record_module(converted.operations.len());
    stats.record_api_files(parts.len());
    stats.record_traces(converted.traces);
    stats.record_warnings(registry.take_warnings());

    Ok(ModuleOutput { files, declarations })
  }
}

/// Packs rendered operations into files of at most `budget` lines.
///
/// Every file starts with `header` and its line count. A file is closed when
/// the next operation would push it past the budget, unless it is still
/// empty, so an oversized operation gets a file of its own.
pub(crate) fn split_operations(header: &str, operations: &[String], budget: usize) -> Vec<String> {
  let header_lines = count_lines(header);
  let mut files = Vec::new();
  let mut chunk: Vec<&str> = Vec::new();
  let mut line_count = header_lines;

  for operation in operations {
    let lines = count_lines(operation);
    if line_count + lines > budget && !chunk.is_empty() {
      files.push(assemble_file(header, &chunk));
      chunk.clear();
      line_count = header_lines;
    }
    chunk.push(operation);
    line_count += lines;
  }

  if !chunk.is_empty() {
    files.push(assemble_file(header, &chunk));
  }
  files
}

fn assemble_file(header: &str, chunk: &[&str]) -> String {
  let mut out = String::from(header);
  if !header.is_empty() && !header.ends_with("\n\n") {
    out.push('\n');
  }
  out.push_str(&chunk.join("\n"));
  out
}
