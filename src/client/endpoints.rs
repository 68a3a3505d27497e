//! Paths of the DuckBug REST API, relative to the configured base URL.

use crate::utils::query::encode_segment;

pub const LOGIN: &str = "/login";
pub const SIGNUP: &str = "/signup";
pub const REFRESH: &str = "/refresh";

pub const PROJECTS: &str = "/projects";
pub const ERRORS: &str = "/errors";
pub const ERRORS_STATS: &str = "/errors/stats";
pub const ERROR_GROUPS: &str = "/error-groups";
pub const ERROR_GROUPS_STATUS_BATCH: &str = "/error-groups/status:batch";
pub const LOGS: &str = "/logs";
pub const LOGS_STATS: &str = "/logs/stats";
pub const LOG_GROUPS: &str = "/log-groups";
pub const TECHNOLOGIES: &str = "/technologies";

fn by_id(root: &str, id: &str) -> String {
    format!("{}/{}", root, encode_segment(id))
}

pub fn project(id: &str) -> String {
    by_id(PROJECTS, id)
}

pub fn project_dsn(id: &str) -> String {
    format!("{}/dsn", project(id))
}

pub fn error(id: &str) -> String {
    by_id(ERRORS, id)
}

pub fn error_group(id: &str) -> String {
    by_id(ERROR_GROUPS, id)
}

pub fn error_group_status(id: &str) -> String {
    format!("{}/status", error_group(id))
}

pub fn log(id: &str) -> String {
    by_id(LOGS, id)
}

pub fn log_group(id: &str) -> String {
    by_id(LOG_GROUPS, id)
}

pub fn technology(id: i64) -> String {
    format!("{}/{}", TECHNOLOGIES, id)
}
