pub(crate) mod constants;
pub(crate) mod identifiers;
pub(crate) mod modules;
pub(crate) mod operations;
