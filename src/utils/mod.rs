pub mod file_store;
pub mod jwt;
pub mod pagination;
pub mod tracing;
