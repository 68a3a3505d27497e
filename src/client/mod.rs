//! Authenticated HTTP pipeline: bearer injection, one-shot refresh on 401,
//! and typed decoding of responses.

pub mod decoder;
pub mod endpoints;
pub mod error;
pub mod hooks;
pub mod http;

pub use error::{ClientError, HttpError, HttpReason};
pub use hooks::{RefreshedTokens, SessionHooks};
pub use http::{ApiClient, RequestOptions};
