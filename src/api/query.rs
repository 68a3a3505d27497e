use crate::models::{ErrorGroupStatus, LogLevel};
use crate::utils::query::build_search_params;

/// Default page size used by list views.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// 1-based page of a list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Page 0 is read as page 1.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    fn params(&self) -> [(&'static str, Option<String>); 3] {
        [
            ("sort", Some("desc".to_string())),
            ("limit", Some(self.page_size.to_string())),
            ("offset", Some(self.offset().to_string())),
        ]
    }
}

/// Inclusive bounds on event time, in the API's timestamp unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl TimeRange {
    fn params(&self) -> [(&'static str, Option<String>); 2] {
        [
            ("timeFrom", self.from.map(|t| t.to_string())),
            ("timeTo", self.to.map(|t| t.to_string())),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorFilters {
    pub project_id: Option<String>,
    pub group_id: Option<String>,
    pub search: Option<String>,
    pub time: TimeRange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorGroupFilters {
    pub project_id: Option<String>,
    pub search: Option<String>,
    pub time: TimeRange,
    pub status: Option<ErrorGroupStatus>,
}

/// Filters for both `/logs` and `/log-groups`; `group_id` only applies to `/logs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilters {
    pub project_id: Option<String>,
    pub group_id: Option<String>,
    pub level: Option<LogLevel>,
    pub search: Option<String>,
    pub time: TimeRange,
}

impl ErrorFilters {
    pub(crate) fn to_query(&self, page: &PageRequest) -> String {
        let [from, to] = self.time.params();
        build_search_params(page.params().into_iter().chain([
            ("projectId", self.project_id.clone()),
            ("groupId", self.group_id.clone()),
            ("search", self.search.clone()),
            from,
            to,
        ]))
    }
}

impl ErrorGroupFilters {
    pub(crate) fn to_query(&self, page: &PageRequest) -> String {
        let [from, to] = self.time.params();
        build_search_params(page.params().into_iter().chain([
            ("projectId", self.project_id.clone()),
            ("search", self.search.clone()),
            from,
            to,
            ("status", self.status.map(|s| s.as_str().to_string())),
        ]))
    }
}

impl LogFilters {
    pub(crate) fn to_query(&self, page: &PageRequest, include_group: bool) -> String {
        let [from, to] = self.time.params();
        let group_id = if include_group {
            self.group_id.clone()
        } else {
            None
        };
        build_search_params(page.params().into_iter().chain([
            ("projectId", self.project_id.clone()),
            ("groupId", group_id),
            ("level", self.level.map(|l| l.as_str().to_string())),
            ("search", self.search.clone()),
            from,
            to,
        ]))
    }
}

pub(crate) fn page_query(page: &PageRequest) -> String {
    build_search_params(page.params())
}

pub(crate) fn stats_query(project_id: &str, group_id: Option<&str>) -> String {
    build_search_params([
        ("projectId", Some(project_id.to_string())),
        ("groupId", group_id.map(str::to_string)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_from_page() {
        assert_eq!(PageRequest::new(1, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 25).offset(), 50);
        assert_eq!(PageRequest::new(0, 25).offset(), 0);
    }

    #[test]
    fn test_page_query() {
        assert_eq!(
            page_query(&PageRequest::new(2, 10)),
            "sort=desc&limit=10&offset=10"
        );
    }

    #[test]
    fn test_error_filters_skip_empty() {
        let filters = ErrorFilters {
            project_id: Some("p1".into()),
            search: Some(String::new()),
            time: TimeRange {
                from: Some(100),
                to: None,
            },
            ..Default::default()
        };
        assert_eq!(
            filters.to_query(&PageRequest::default()),
            "sort=desc&limit=20&offset=0&projectId=p1&timeFrom=100"
        );
    }

    #[test]
    fn test_group_filters_status() {
        let filters = ErrorGroupFilters {
            status: Some(ErrorGroupStatus::Resolved),
            ..Default::default()
        };
        assert_eq!(
            filters.to_query(&PageRequest::new(1, 5)),
            "sort=desc&limit=5&offset=0&status=resolved"
        );
    }

    #[test]
    fn test_log_filters_group_only_when_asked() {
        let filters = LogFilters {
            group_id: Some("lg1".into()),
            level: Some(LogLevel::Error),
            ..Default::default()
        };
        let with_group = filters.to_query(&PageRequest::new(1, 5), true);
        let without_group = filters.to_query(&PageRequest::new(1, 5), false);
        assert_eq!(with_group, "sort=desc&limit=5&offset=0&groupId=lg1&level=ERROR");
        assert_eq!(without_group, "sort=desc&limit=5&offset=0&level=ERROR");
    }

    #[test]
    fn test_stats_query() {
        assert_eq!(stats_query("p1", None), "projectId=p1");
        assert_eq!(stats_query("p1", Some("g1")), "projectId=p1&groupId=g1");
    }
}
