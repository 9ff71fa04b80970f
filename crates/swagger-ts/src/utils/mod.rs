pub mod fs;
pub mod refs;
pub mod spec;
pub mod swagger2;

pub(crate) use refs::parse_schema_ref_path;
