pub(crate) const SHARED_API_MODULE: &str = "@/api";
pub(crate) const REQUEST_IMPORT: &str = "import request from '@/utils/request';";
pub(crate) const API_RESULT_TYPE: &str = "ApiResult";
pub(crate) const MODEL_MODULE: &str = "./model";

pub(crate) const ROOT_INDEX_CONTENT: &str = "// Code generated by swagger-ts. DO NOT EDIT.\n\nexport * from './typing';\n";

pub(crate) const PATH_PARAM_LABEL: &str = "路径参数";
pub(crate) const BODY_PARAM_LABEL: &str = "请求数据";
pub(crate) const QUERY_PARAM_LABEL: &str = "查询参数";

pub(crate) const BODY_ARGUMENT: &str = "data";
pub(crate) const QUERY_ARGUMENT: &str = "params";
pub(crate) const FORM_DATA_VARIABLE: &str = "formData";
pub(crate) const FORM_HEADERS: &str = "headers: { 'Content-Type': 'multipart/form-data' }";

pub(crate) const INDENT: &str = "  ";
