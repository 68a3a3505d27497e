pub mod logger;
pub mod query;
