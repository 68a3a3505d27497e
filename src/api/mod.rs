//! Typed resource calls, one `impl ApiClient` block per resource.

pub mod errors;
pub mod logs;
pub mod projects;
pub mod query;
pub mod technologies;

pub use query::{ErrorFilters, ErrorGroupFilters, LogFilters, PageRequest, TimeRange};
