//! Resolved operation records handed from the converter to the renderer.

use http::Method;

use super::converter::responses::PAGE_RESULT_TYPE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathParam {
  /// Placeholder name as written in the URL template.
  pub name: String,
  /// Sanitized argument name used in the emitted function.
  pub variable: String,
  pub type_expr: String,
  pub description: Option<String>,
  pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueryInfo {
  pub type_name: String,
  pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BodyInfo {
  pub type_name: String,
  pub optional: bool,
  pub is_form: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReturnInfo {
  pub type_expr: String,
  pub is_void: bool,
  /// Wraps the payload in the shared `PageResult<T>` generic.
  pub uses_page_result: bool,
}

impl ReturnInfo {
  pub(crate) fn void() -> Self {
    Self {
      type_expr: "void".to_string(),
      is_void: true,
      uses_page_result: false,
    }
  }

  pub(crate) fn of(type_expr: impl Into<String>) -> Self {
    Self {
      type_expr: type_expr.into(),
      is_void: false,
      uses_page_result: false,
    }
  }

  pub(crate) fn page(element_type: &str) -> Self {
    Self {
      type_expr: format!("{PAGE_RESULT_TYPE}<{element_type}>"),
      is_void: false,
      uses_page_result: true,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OperationDef {
  pub name: String,
  pub summary: Option<String>,
  pub method: Method,
  pub path: String,
  pub path_params: Vec<PathParam>,
  pub query: Option<QueryInfo>,
  pub body: Option<BodyInfo>,
  pub returns: ReturnInfo,
  pub error_text: String,
}

impl OperationDef {
  pub(crate) fn method_name(&self) -> String {
    self.method.as_str().to_lowercase()
  }

  pub(crate) fn uses_page_result(&self) -> bool {
    self.returns.uses_page_result
  }
}
