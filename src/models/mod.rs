//! Wire types of the DuckBug API. Field names are camelCase on the wire.

pub mod auth;
pub mod common;
pub mod error_event;
pub mod log;
pub mod project;
pub mod technology;
pub mod wire;

pub use auth::{Credentials, LoginResponse, SignupResponse};
pub use common::{Dsn, Page, Stats};
pub use error_event::{ErrorContext, ErrorEvent, ErrorGroup, ErrorGroupStatus};
pub use log::{LogContext, LogEntry, LogGroup, LogLevel};
pub use project::{Project, ProjectInput};
pub use technology::Technology;
pub use wire::Nullable;
