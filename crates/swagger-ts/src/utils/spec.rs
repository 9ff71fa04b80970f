use std::{path::PathBuf, time::Duration};

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde_json::Value;
use strum::Display;
use thiserror::Error;

use super::swagger2;
use crate::spec::ApiSpec;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("input is empty")]
  EmptyInput,
  #[error("fetch url failed: {0}")]
  Fetch(#[from] reqwest::Error),
  #[error("fetch url failed: status {0}")]
  Status(reqwest::StatusCode),
  #[error("read file '{}' failed: {message}", path.display())]
  Read { path: PathBuf, message: String },
  #[error("convert yaml to json failed: {0}")]
  Yaml(#[from] serde_yaml::Error),
  #[error("parse json failed: {0}")]
  Json(#[source] serde_json::Error),
  #[error("cannot detect spec version: missing openapi or swagger")]
  UnknownVersion,
  #[error("convert swagger2 to openapi3 failed: {0}")]
  Swagger2(String),
  #[error("load {version} failed: {source}")]
  Model {
    version: SpecVersion,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SpecVersion {
  #[strum(to_string = "OpenAPI 3")]
  OpenApi3,
  #[strum(to_string = "Swagger 2.0")]
  Swagger2,
}

/// Where the document came from and which dialect it was written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecMeta {
  pub source: String,
  pub version: SpecVersion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SpecSource {
  File(PathBuf),
  Url(String),
}

/// Reads an OpenAPI 3 or Swagger 2 document from disk or over HTTP.
#[derive(Debug, Clone)]
pub struct SpecLoader {
  input: String,
  source: SpecSource,
}

impl SpecLoader {
  pub fn new(input: &str) -> Result<Self, LoadError> {
    let input = input.trim();
    if input.is_empty() {
      return Err(LoadError::EmptyInput);
    }

    let source = if input.starts_with("http://") || input.starts_with("https://") {
      SpecSource::Url(input.to_string())
    } else {
      SpecSource::File(PathBuf::from(input))
    };
    Ok(Self {
      input: input.to_string(),
      source,
    })
  }

  pub fn is_remote(&self) -> bool {
    matches!(self.source, SpecSource::Url(_))
  }

  pub async fn load(&self) -> Result<(ApiSpec, SpecMeta), LoadError> {
    let (spec, version) = match &self.source {
      SpecSource::Url(url) => parse_document(&fetch(url).await?)?,
      SpecSource::File(path) => {
        let file = AsyncMmapFile::open(path).await.map_err(|err| LoadError::Read {
          path: path.clone(),
          message: err.to_string(),
        })?;
        parse_document(file.as_slice())?
      }
    };

    let meta = SpecMeta {
      source: self.input.clone(),
      version,
    };
    Ok((spec, meta))
  }
}

async fn fetch(url: &str) -> Result<Vec<u8>, LoadError> {
  let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
  let response = client.get(url).send().await?;
  let status = response.status();
  if !status.is_success() {
    return Err(LoadError::Status(status));
  }
  Ok(response.bytes().await?.to_vec())
}

/// Parses raw JSON or YAML bytes into the typed model, upgrading Swagger 2 first.
pub fn parse_document(bytes: &[u8]) -> Result<(ApiSpec, SpecVersion), LoadError> {
  let document = to_json(bytes)?;
  let version = detect_version(&document)?;
  let document = match version {
    SpecVersion::OpenApi3 => document,
    SpecVersion::Swagger2 => swagger2::upgrade(document).map_err(LoadError::Swagger2)?,
  };

  let spec = ApiSpec::from_value(document).map_err(|source| LoadError::Model { version, source })?;
  Ok((spec, version))
}

/// Documents that already parse as a JSON object are used as is; anything else goes through YAML.
fn to_json(bytes: &[u8]) -> Result<Value, LoadError> {
  if let Ok(value @ Value::Object(_)) = serde_json::from_slice::<Value>(bytes) {
    return Ok(value);
  }
  let yaml: serde_yaml::Value = serde_yaml::from_slice(bytes)?;
  serde_json::to_value(yaml).map_err(LoadError::Json)
}

fn detect_version(document: &Value) -> Result<SpecVersion, LoadError> {
  let Some(root) = document.as_object() else {
    return Err(LoadError::UnknownVersion);
  };
  if root.contains_key("openapi") {
    Ok(SpecVersion::OpenApi3)
  } else if root.contains_key("swagger") {
    Ok(SpecVersion::Swagger2)
  } else {
    Err(LoadError::UnknownVersion)
  }
}
