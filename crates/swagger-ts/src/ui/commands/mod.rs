#![allow(clippy::struct_excessive_bools)]

pub mod generate;
pub mod list;

pub use generate::{ConfigError, GenerateConfig, generate_code};
pub use list::list_operations;
