use std::collections::BTreeSet;

use super::responses::resolve_return_type;
use crate::{
  generator::{
    ast::{BodyInfo, OperationDef, PathParam, QueryInfo},
    errors::GenerateError,
    metrics::OperationTrace,
    naming::{
      identifiers::ensure_unique,
      operations::{body_type_hint, failure_message, path_param_variable, query_type_hint},
    },
    operation_registry::{RawOperation, RawParameter, RawRequestBody},
    type_registry::TypeRegistry,
  },
  spec::{RefOr, Schema, SchemaType},
};

pub(crate) const PAGE_PARAM_TYPE: &str = "PageParam";
pub(crate) const PAGE_INDEX_PARAM: &str = "current";
pub(crate) const PAGE_SIZE_PARAM: &str = "pageSize";

const FORM_DATA_DESCRIPTION: &str = "FormData";

/// What resolving a module's operations leaves behind besides the
/// definitions in the registry.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConvertedOperations {
  pub operations: Vec<OperationDef>,
  /// Registered names the API file imports from `./model`, sorted.
  pub used_types: Vec<String>,
  pub uses_page_result: bool,
  pub traces: Vec<OperationTrace>,
}

/// Resolves raw operations of one module into renderable definitions,
/// registering every type they mention in the module's registry.
pub(crate) struct OperationConverter<'r, 'a> {
  registry: &'r mut TypeRegistry<'a>,
  operation_names: BTreeSet<String>,
  used_types: BTreeSet<String>,
  uses_page_result: bool,
  operations: Vec<OperationDef>,
  traces: Vec<OperationTrace>,
}

impl<'r, 'a> OperationConverter<'r, 'a> {
  pub(crate) fn new(registry: &'r mut TypeRegistry<'a>) -> Self {
    Self {
      registry,
      operation_names: BTreeSet::new(),
      used_types: BTreeSet::new(),
      uses_page_result: false,
      operations: Vec::new(),
      traces: Vec::new(),
    }
  }

  /// Converts every operation in order, stopping at the first fatal error.
  pub(crate) fn convert_all<'o>(
    mut self,
    raw_operations: impl IntoIterator<Item = &'o RawOperation<'a>>,
  ) -> Result<ConvertedOperations, GenerateError>
  where
    'a: 'o,
  {
    for raw in raw_operations {
      self.convert(raw)?;
    }
    Ok(self.finish())
  }

  pub(crate) fn convert(&mut self, raw: &RawOperation<'a>) -> Result<(), GenerateError> {
    let name = ensure_unique(&raw.name, &self.operation_names);
    self.operation_names.insert(name.clone());

    let path_params = self.convert_path_params(&raw.path_params);
    let is_page_query = has_page_params(&raw.query_params);
    let query = self.convert_query(&name, &raw.module, &raw.query_params, is_page_query);
    let body = match &raw.body {
      Some(body) => Some(self.convert_body(&name, raw, body)?),
      None => None,
    };

    let (returns, return_types) = resolve_return_type(self.registry, &name, raw.response, is_page_query);
    self.used_types.extend(return_types);

    let operation = OperationDef {
      name,
      summary: raw.summary.clone(),
      method: raw.method.clone(),
      path: raw.path.clone(),
      path_params,
      query,
      body,
      returns,
      error_text: failure_message(raw.summary.as_deref()),
    };
    self.uses_page_result |= operation.uses_page_result();
    self.traces.push(trace(raw, &operation, is_page_query));
    self.operations.push(operation);
    Ok(())
  }

  pub(crate) fn finish(self) -> ConvertedOperations {
    ConvertedOperations {
      operations: self.operations,
      used_types: self.used_types.into_iter().collect(),
      uses_page_result: self.uses_page_result,
      traces: self.traces,
    }
  }

  fn convert_path_params(&mut self, params: &[RawParameter<'a>]) -> Vec<PathParam> {
    let mut taken: Vec<String> = Vec::with_capacity(params.len());
    let mut converted = Vec::with_capacity(params.len());

    for param in params {
      let variable = path_param_variable(&param.name, &taken);
      taken.push(variable.clone());

      let type_expr = self.registry.type_expr(Some(param.schema.get()));
      if self.registry.contains(&type_expr) {
        self.used_types.insert(type_expr.clone());
      }

      converted.push(PathParam {
        name: param.name.clone(),
        variable,
        type_expr,
        description: param.description.clone().filter(|text| !text.trim().is_empty()),
        required: param.required,
      });
    }
    converted
  }

  /// Query parameters collapse into one object type. Page queries leave
  /// `current`/`pageSize` to the shared `PageParam` base type.
  fn convert_query(
    &mut self,
    operation_name: &str,
    module: &str,
    params: &[RawParameter<'a>],
    is_page_query: bool,
  ) -> Option<QueryInfo> {
    if params.is_empty() {
      return None;
    }

    let schema = query_schema(params, is_page_query);
    let hint = query_type_hint(operation_name, module);
    let extends: &[&str] = if is_page_query { &[PAGE_PARAM_TYPE] } else { &[] };
    let type_name = self.registry.register_inline_with_extends(&hint, schema, None, extends);
    self.used_types.insert(type_name.clone());

    Some(QueryInfo {
      type_name,
      optional: !has_required_params(params, is_page_query),
    })
  }

  fn convert_body(
    &mut self,
    operation_name: &str,
    raw: &RawOperation<'a>,
    body: &RawRequestBody<'a>,
  ) -> Result<BodyInfo, GenerateError> {
    let type_name = match body.schema {
      RefOr::Ref { ref_path, .. } => {
        self
          .registry
          .register_ref(ref_path)
          .map_err(|source| GenerateError::RequestBody {
            method: raw.method.to_string(),
            path: raw.path.clone(),
            source: Box::new(source),
          })?
      }
      RefOr::Item(_) => {
        let description = body.is_form.then_some(FORM_DATA_DESCRIPTION);
        self
          .registry
          .register_inline(&body_type_hint(operation_name), body.schema, description)
      }
    };
    self.used_types.insert(type_name.clone());

    Ok(BodyInfo {
      type_name,
      optional: !body.required,
      is_form: body.is_form,
    })
  }
}

pub(crate) fn is_page_param(name: &str) -> bool {
  name == PAGE_INDEX_PARAM || name == PAGE_SIZE_PARAM
}

/// True when both the page index and the page size are query parameters.
pub(crate) fn has_page_params(params: &[RawParameter<'_>]) -> bool {
  params.iter().any(|param| param.name == PAGE_INDEX_PARAM) && params.iter().any(|param| param.name == PAGE_SIZE_PARAM)
}

fn has_required_params(params: &[RawParameter<'_>], exclude_page: bool) -> bool {
  params
    .iter()
    .filter(|param| !(exclude_page && is_page_param(&param.name)))
    .any(|param| param.required)
}

/// Object schema carrying one property per query parameter, with parameter
/// descriptions copied onto inline property schemas.
fn query_schema(params: &[RawParameter<'_>], exclude_page: bool) -> Schema {
  let mut schema = Schema::of_type(SchemaType::Object);
  for param in params {
    if exclude_page && is_page_param(&param.name) {
      continue;
    }

    let mut property = param.schema.get().clone();
    if let RefOr::Item(inner) = &mut property
      && let Some(description) = param.description.as_deref().filter(|text| !text.trim().is_empty())
    {
      inner.description = Some(description.to_string());
    }
    schema.properties.insert(param.name.clone(), property);
    if param.required {
      schema.required.push(param.name.clone());
    }
  }
  schema
}

fn trace(raw: &RawOperation<'_>, operation: &OperationDef, is_page_query: bool) -> OperationTrace {
  let query_type = operation.query.as_ref().map(|query| {
    let optional = if query.optional { "?" } else { "" };
    let base = if is_page_query {
      format!("+{PAGE_PARAM_TYPE}")
    } else {
      String::new()
    };
    format!("{}{optional}{base}", query.type_name)
  });
  let body_type = operation.body.as_ref().map(|body| {
    let optional = if body.optional { "?" } else { "" };
    let form = if body.is_form { "(form)" } else { "" };
    format!("{}{optional}{form}", body.type_name)
  });

  OperationTrace {
    module: raw.module.clone(),
    name: operation.name.clone(),
    method: raw.method.to_string(),
    path: raw.path.clone(),
    paginated: is_page_query,
    path_params: raw.path_params.iter().map(|param| param.name.clone()).collect(),
    query_type,
    query_fields: raw
      .query_params
      .iter()
      .filter(|param| !(is_page_query && is_page_param(&param.name)))
      .map(|param| param.name.clone())
      .collect(),
    body_type,
    return_type: operation.returns.type_expr.clone(),
  }
}
