use std::{
  collections::{BTreeMap, HashMap},
  sync::LazyLock,
};

use http::Method;
use regex::Regex;

use crate::{
  generator::{
    errors::GenerateError,
    metrics::GenerationWarning,
    naming::{modules::module_name_for_path, operations::operation_name},
    type_registry::SchemaSource,
  },
  spec::{ApiSpec, MediaType, Operation, Parameter, ParameterIn, RefOr, Schema},
};

static PATH_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^}]+)\}").unwrap());

/// Methods in the order operations of one path are emitted.
pub(crate) const METHOD_ORDER: [Method; 7] = [
  Method::GET,
  Method::POST,
  Method::PUT,
  Method::PATCH,
  Method::DELETE,
  Method::HEAD,
  Method::OPTIONS,
];

type ParameterTable<'a> = HashMap<(ParameterIn, String), &'a Parameter>;

const JSON_CONTENT_TYPE: &str = "application/json";
const JSON_WILDCARD_CONTENT_TYPE: &str = "application/*+json";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";
const URLENCODED_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A path or query parameter after `$ref` resolution and path/operation merging.
#[derive(Debug, Clone)]
pub(crate) struct RawParameter<'a> {
  pub name: String,
  pub location: ParameterIn,
  pub description: Option<String>,
  pub required: bool,
  /// Missing parameter schemas are replaced with an unconstrained one.
  pub schema: SchemaSource<'a>,
}

#[derive(Debug, Clone)]
pub(crate) struct RawRequestBody<'a> {
  pub schema: &'a RefOr<Schema>,
  pub required: bool,
  /// Multipart or URL-encoded form submission.
  pub is_form: bool,
}

/// One `(path, method)` pair, with everything needed to resolve it into a function.
#[derive(Debug, Clone)]
pub(crate) struct RawOperation<'a> {
  pub name: String,
  pub summary: Option<String>,
  pub method: Method,
  pub path: String,
  pub module: String,
  /// In URL placeholder order.
  pub path_params: Vec<RawParameter<'a>>,
  /// Sorted by name.
  pub query_params: Vec<RawParameter<'a>>,
  pub body: Option<RawRequestBody<'a>>,
  pub response: Option<&'a RefOr<Schema>>,
}

/// Every operation of a document, in deterministic order: paths sorted, then
/// methods in [`METHOD_ORDER`].
#[derive(Debug)]
pub(crate) struct OperationRegistry<'a> {
  operations: Vec<RawOperation<'a>>,
  warnings: Vec<GenerationWarning>,
}

impl<'a> OperationRegistry<'a> {
  pub(crate) fn from_spec(spec: &'a ApiSpec) -> Result<Self, GenerateError> {
    let paths = spec.paths.as_ref().ok_or(GenerateError::MissingPaths)?;
    let mut registry = Self {
      operations: Vec::new(),
      warnings: Vec::new(),
    };

    for (path, item) in paths {
      for method in &METHOD_ORDER {
        let Some(operation) = item.operation(method) else {
          continue;
        };
        let parameters = registry.merge_parameters(spec, method, path, &item.parameters, &operation.parameters);
        registry.operations.push(RawOperation {
          name: operation_name(operation.operation_id.as_deref(), method, path),
          summary: operation
            .summary
            .as_deref()
            .map(str::trim)
            .filter(|summary| !summary.is_empty())
            .map(String::from),
          method: method.clone(),
          path: path.clone(),
          module: module_name_for_path(path),
          path_params: extract_path_params(&parameters, path),
          query_params: extract_query_params(&parameters),
          body: extract_request_body(spec, operation),
          response: extract_response_schema(spec, operation),
        });
      }
    }

    Ok(registry)
  }

  pub(crate) fn operations(&self) -> &[RawOperation<'a>] {
    &self.operations
  }

  pub(crate) fn len(&self) -> usize {
    self.operations.len()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.operations.is_empty()
  }

  /// Operations grouped by module, modules in name order, operations in registry order.
  pub(crate) fn modules(&self) -> BTreeMap<&str, Vec<&RawOperation<'a>>> {
    let mut modules: BTreeMap<&str, Vec<&RawOperation<'a>>> = BTreeMap::new();
    for operation in &self.operations {
      modules.entry(operation.module.as_str()).or_default().push(operation);
    }
    modules
  }

  pub(crate) fn take_warnings(&mut self) -> Vec<GenerationWarning> {
    std::mem::take(&mut self.warnings)
  }

  /// Path-item parameters overlaid by operation parameters, keyed by location and name.
  fn merge_parameters(
    &mut self,
    spec: &'a ApiSpec,
    method: &Method,
    path: &str,
    shared: &'a [RefOr<Parameter>],
    own: &'a [RefOr<Parameter>],
  ) -> ParameterTable<'a> {
    let mut merged = HashMap::new();
    for parameter in shared.iter().chain(own) {
      match spec.resolve_parameter(parameter) {
        Some(resolved) => {
          merged.insert((resolved.location, resolved.name.clone()), resolved);
        }
        None => self.warnings.push(GenerationWarning::ParameterSkipped {
          method: method.to_string(),
          path: path.to_string(),
          reference: parameter.ref_path().unwrap_or_default().to_string(),
        }),
      }
    }
    merged
  }
}

fn raw_parameter<'a>(parameter: &'a Parameter) -> RawParameter<'a> {
  RawParameter {
    name: parameter.name.clone(),
    location: parameter.location,
    description: parameter.description.clone(),
    required: parameter.required,
    schema: parameter
      .schema
      .as_ref()
      .map_or_else(|| SchemaSource::from(Schema::default()), SchemaSource::Borrowed),
  }
}

/// Path parameters follow the URL placeholders. A placeholder without a
/// declaration still yields a required, unconstrained parameter.
fn extract_path_params<'a>(parameters: &ParameterTable<'a>, path: &str) -> Vec<RawParameter<'a>> {
  PATH_PLACEHOLDER_RE
    .captures_iter(path)
    .map(|caps| {
      let name = caps[1].to_string();
      match parameters.get(&(ParameterIn::Path, name)).copied() {
        Some(parameter) => raw_parameter(parameter),
        None => RawParameter {
          name: caps[1].to_string(),
          location: ParameterIn::Path,
          description: None,
          required: true,
          schema: SchemaSource::from(Schema::default()),
        },
      }
    })
    .collect()
}

fn extract_query_params<'a>(parameters: &ParameterTable<'a>) -> Vec<RawParameter<'a>> {
  let mut query: Vec<&'a Parameter> = parameters
    .iter()
    .filter(|((location, _), _)| *location == ParameterIn::Query)
    .map(|(_, parameter)| *parameter)
    .collect();
  query.sort_by(|a, b| a.name.cmp(&b.name));
  query.into_iter().map(raw_parameter).collect()
}

fn extract_request_body<'a>(spec: &'a ApiSpec, operation: &'a Operation) -> Option<RawRequestBody<'a>> {
  let body = spec.resolve_request_body(operation.request_body.as_ref()?)?;
  let (content_type, media) = pick_media_type(&body.content)?;
  Some(RawRequestBody {
    schema: media.schema.as_ref()?,
    required: body.required,
    is_form: is_form_content(content_type),
  })
}

fn extract_response_schema<'a>(spec: &'a ApiSpec, operation: &'a Operation) -> Option<&'a RefOr<Schema>> {
  let responses = &operation.responses;
  let chosen = responses
    .get("200")
    .or_else(|| responses.get("201"))
    .or_else(|| {
      responses
        .iter()
        .find(|(status, _)| status.starts_with('2'))
        .map(|(_, response)| response)
    })
    .or_else(|| responses.get("default"))?;

  let response = spec.resolve_response(chosen)?;
  let (_, media) = pick_media_type(&response.content)?;
  media.schema.as_ref()
}

/// `application/json` first (or its `application/*+json` wildcard), then the
/// first form type, then whatever sorts first.
pub(crate) fn pick_media_type(content: &BTreeMap<String, MediaType>) -> Option<(&str, &MediaType)> {
  let entry = content
    .get_key_value(JSON_CONTENT_TYPE)
    .or_else(|| content.get_key_value(JSON_WILDCARD_CONTENT_TYPE))
    .or_else(|| content.iter().find(|(content_type, _)| is_form_content(content_type)))
    .or_else(|| content.iter().next())?;
  Some((entry.0.as_str(), entry.1))
}

pub(crate) fn is_form_content(content_type: &str) -> bool {
  let essence = content_type.split(';').next().unwrap_or_default().trim();
  essence.eq_ignore_ascii_case(MULTIPART_CONTENT_TYPE) || essence.eq_ignore_ascii_case(URLENCODED_CONTENT_TYPE)
}
