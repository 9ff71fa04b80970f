//! Schema and operation resolution: everything between the raw operation
//! records and the renderable definitions.

pub(crate) mod field_optionality;
pub(crate) mod operations;
pub(crate) mod responses;
pub(crate) mod type_resolver;

pub(crate) use field_optionality::FieldOptionalityPolicy;
pub(crate) use operations::{ConvertedOperations, OperationConverter};

#[cfg(test)]
mod tests;
