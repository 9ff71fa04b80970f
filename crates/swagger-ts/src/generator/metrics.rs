use std::fmt;

use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub modules_generated: usize,
  pub operations_converted: usize,
  pub types_generated: usize,
  pub types_reexported: usize,
  pub api_files_written: usize,
  pub warnings: Vec<GenerationWarning>,
  pub traces: Vec<OperationTrace>,
}

impl GenerationStats {
  pub fn record_module(&mut self, operations: usize) {
    self.modules_generated += 1;
    self.operations_converted += operations;
  }

  /// Re-exported types count toward `types_generated` as well.
  pub fn record_types(&mut self, declared: usize, reexported: usize) {
    self.types_generated += declared + reexported;
    self.types_reexported += reexported;
  }

  pub fn record_api_files(&mut self, count: usize) {
    self.api_files_written += count;
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }

  pub fn record_traces(&mut self, traces: impl IntoIterator<Item = OperationTrace>) {
    self.traces.extend(traces);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Unresolved reference '{reference}' rendered as any: {error}")]
  UnresolvedReference { reference: String, error: String },
  #[strum(to_string = "Skipped parameter '{reference}' on {method} {path}: not found in components")]
  ParameterSkipped {
    method: String,
    path: String,
    reference: String,
  },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::ParameterSkipped { .. })
  }
}

/// One line of per-operation detail, printed in verbose mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTrace {
  pub module: String,
  pub name: String,
  pub method: String,
  pub path: String,
  pub paginated: bool,
  pub path_params: Vec<String>,
  pub query_type: Option<String>,
  pub query_fields: Vec<String>,
  pub body_type: Option<String>,
  pub return_type: String,
}

impl fmt::Display for OperationTrace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let dash = |value: Option<&str>| value.unwrap_or("-").to_string();
    let list = |values: &[String]| {
      if values.is_empty() {
        "-".to_string()
      } else {
        values.join(",")
      }
    };
    write!(
      f,
      "{}.{} {} {} page={} path={} query={}({}) body={} returns={}",
      self.module,
      self.name,
      self.method,
      self.path,
      self.paginated,
      list(&self.path_params),
      dash(self.query_type.as_deref()),
      list(&self.query_fields),
      dash(self.body_type.as_deref()),
      self.return_type,
    )
  }
}
