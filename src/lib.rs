//! Library exports for the DuckBug client, shared between the binary and tests.

pub mod api;
pub mod client;
pub mod config;
pub mod models;
pub mod session;
pub mod startup;
pub mod state;
pub mod store;
pub mod utils;
