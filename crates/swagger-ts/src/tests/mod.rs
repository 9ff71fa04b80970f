mod common;
mod pagination;
