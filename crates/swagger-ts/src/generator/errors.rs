use thiserror::Error;

/// Failures that abort a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
  #[error("spec has no paths")]
  MissingPaths,
  #[error("empty $ref")]
  EmptyReference,
  #[error("unsupported $ref '{0}': only internal schema components are resolved")]
  InvalidReference(String),
  #[error("unresolved $ref '{0}'")]
  UnresolvedReference(String),
  #[error("request body of {method} {path}: {source}")]
  RequestBody {
    method: String,
    path: String,
    #[source]
    source: Box<GenerateError>,
  },
}
