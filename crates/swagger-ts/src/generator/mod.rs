pub(crate) mod ast;
pub(crate) mod codegen;
pub(crate) mod converter;
pub(crate) mod errors;
pub mod metrics;
pub(crate) mod naming;
pub(crate) mod operation_registry;
pub mod orchestrator;
pub(crate) mod type_registry;

#[cfg(test)]
mod tests;
