use std::fmt::Write as _;

use http::Method;

use super::constants::{
  API_RESULT_TYPE, BODY_ARGUMENT, BODY_PARAM_LABEL, FORM_DATA_VARIABLE, FORM_HEADERS, MODEL_MODULE, PATH_PARAM_LABEL,
  QUERY_ARGUMENT, QUERY_PARAM_LABEL, REQUEST_IMPORT, SHARED_API_MODULE,
};
use crate::generator::{
  ast::OperationDef,
  codegen::doc_text,
  converter::responses::PAGE_RESULT_TYPE,
  naming::identifiers::escape_single_quoted,
};

const FORM_DATA_BUILDER: &str = "  const formData = new FormData();
  if (data) {
    for (const [key, value] of Object.entries(data)) {
      if (value === undefined || value === null) {
        continue;
      }
      if (Array.isArray(value)) {
        for (const item of value) {
          if (item !== undefined && item !== null) {
            formData.append(key, item as any);
          }
        }
      } else {
        formData.append(key, value as any);
      }
    }
  }
";

/// Shared imports at the top of every API file of a module, followed by a blank line.
pub(crate) fn render_api_header(model_imports: &[String], uses_page_result: bool) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{REQUEST_IMPORT}");

  let shared = if uses_page_result {
    format!("{API_RESULT_TYPE}, {PAGE_RESULT_TYPE}")
  } else {
    API_RESULT_TYPE.to_string()
  };
  let _ = writeln!(out, "import type {{ {shared} }} from '{SHARED_API_MODULE}';");

  if !model_imports.is_empty() {
    let mut names = model_imports.to_vec();
    names.sort();
    names.dedup();
    let lines = names.iter().map(|name| format!("  {name}")).collect::<Vec<_>>().join(",\n");
    let _ = writeln!(out, "import type {{\n{lines}\n}} from '{MODEL_MODULE}';");
  }

  out.push('\n');
  out
}

/// Index file of a split module, re-exporting `api_1` through `api_<parts>` in order.
pub(crate) fn render_api_index(parts: usize) -> String {
  (1..=parts).fold(String::new(), |mut out, part| {
    let _ = writeln!(out, "export * from './api_{part}';");
    out
  })
}

/// Renders one operation as a documented `export async function`.
pub(crate) fn render_operation(operation: &OperationDef) -> String {
  let mut out = String::new();
  render_doc(&mut out, operation);

  let _ = writeln!(out, "export async function {}({}) {{", operation.name, render_arguments(operation));
  if operation.body.as_ref().is_some_and(|body| body.is_form) {
    out.push_str(FORM_DATA_BUILDER);
  }
  let _ = writeln!(out, "  const res = await {};", render_request(operation));

  let condition = if operation.returns.is_void {
    "res.data.success"
  } else {
    "res.data.success && res.data.data !== undefined"
  };
  let success = if operation.returns.is_void {
    "return;"
  } else {
    "return res.data.data;"
  };
  let _ = writeln!(out, "  if ({condition}) {{");
  let _ = writeln!(out, "    {success}");
  out.push_str("  }\n");
  let _ = writeln!(
    out,
    "  return Promise.reject(new Error(res.data.error?.message ?? '{}'));",
    escape_single_quoted(&operation.error_text)
  );
  out.push_str("}\n");
  out
}

fn render_doc(out: &mut String, operation: &OperationDef) {
  let summary = doc_text(operation.summary.as_deref()).unwrap_or_else(|| operation.name.clone());
  out.push_str("/**\n");
  let _ = writeln!(out, " * {summary}");
  for param in &operation.path_params {
    let label = doc_text(param.description.as_deref()).unwrap_or_else(|| PATH_PARAM_LABEL.to_string());
    let _ = writeln!(out, " * @param {} - {label}", param.variable);
  }
  if operation.body.is_some() {
    let _ = writeln!(out, " * @param {BODY_ARGUMENT} - {BODY_PARAM_LABEL}");
  }
  if operation.query.is_some() {
    let _ = writeln!(out, " * @param {QUERY_ARGUMENT} - {QUERY_PARAM_LABEL}");
  }
  let _ = writeln!(out, " * @returns Promise<{}>", operation.returns.type_expr);
  out.push_str(" */\n");
}

fn render_arguments(operation: &OperationDef) -> String {
  let optional = |flag: bool| if flag { "?" } else { "" };

  let mut args: Vec<String> = operation
    .path_params
    .iter()
    .map(|param| format!("{}{}: {}", param.variable, optional(!param.required), param.type_expr))
    .collect();
  if let Some(body) = &operation.body {
    args.push(format!("{BODY_ARGUMENT}{}: {}", optional(body.optional), body.type_name));
  }
  if let Some(query) = &operation.query {
    args.push(format!("{QUERY_ARGUMENT}{}: {}", optional(query.optional), query.type_name));
  }
  args.join(", ")
}

/// Single-quoted literal, or a template literal when path parameters are substituted.
fn render_url(operation: &OperationDef) -> String {
  if operation.path_params.is_empty() {
    return format!("'{}'", escape_single_quoted(&operation.path));
  }
  let url = operation.path_params.iter().fold(operation.path.clone(), |url, param| {
    url.replace(&format!("{{{}}}", param.name), &format!("${{{}}}", param.variable))
  });
  format!("`{url}`")
}

fn sends_body_positionally(method: &Method) -> bool {
  matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// The `request.<method><ApiResult<T>>(...)` call expression.
///
/// POST, PUT and PATCH take the body as the second argument; every other
/// method carries it inside the config object.
fn render_request(operation: &OperationDef) -> String {
  let mut args = vec![render_url(operation)];
  let mut config: Vec<String> = Vec::new();
  let has_query = operation.query.is_some();

  match &operation.body {
    Some(body) => {
      let payload = if body.is_form { FORM_DATA_VARIABLE } else { BODY_ARGUMENT };
      if sends_body_positionally(&operation.method) {
        args.push(payload.to_string());
      } else if body.is_form {
        config.push(format!("{BODY_ARGUMENT}: {FORM_DATA_VARIABLE}"));
      } else {
        config.push(BODY_ARGUMENT.to_string());
      }
      if has_query {
        config.push(QUERY_ARGUMENT.to_string());
      }
      if body.is_form {
        config.push(FORM_HEADERS.to_string());
      }
    }
    None if has_query => config.push(QUERY_ARGUMENT.to_string()),
    None => {}
  }

  if !config.is_empty() {
    args.push(format!("{{ {} }}", config.join(", ")));
  }

  format!(
    "request.{}<{API_RESULT_TYPE}<{}>>({})",
    operation.method_name(),
    operation.returns.type_expr,
    args.join(", ")
  )
}
