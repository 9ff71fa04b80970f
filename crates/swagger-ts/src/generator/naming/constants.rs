pub(crate) const FALLBACK_TYPE_NAME: &str = "Model";
pub(crate) const FALLBACK_IDENTIFIER: &str = "value";
pub(crate) const FALLBACK_MODULE: &str = "default";
pub(crate) const MODULE_DIGIT_PREFIX: &str = "group";
pub(crate) const OPERATION_DIGIT_PREFIX: &str = "op";

pub(crate) const QUERY_PARAM_SUFFIX: &str = "QueryParam";
pub(crate) const BODY_SUFFIX: &str = "Body";
pub(crate) const RESULT_SUFFIX: &str = "Result";
pub(crate) const PARAM_SUFFIX: &str = "Param";

pub(crate) const DEFAULT_FAILURE_MESSAGE: &str = "请求失败";
pub(crate) const FAILURE_SUFFIX: &str = "失败";

/// Identifiers the emitted function signature already uses.
pub(crate) const RESERVED_ARGUMENT_NAMES: &[&str] = &["data", "params"];
