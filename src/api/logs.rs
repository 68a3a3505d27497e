use super::query::{stats_query, LogFilters, PageRequest};
use crate::client::{endpoints, ApiClient, ClientError, RequestOptions};
use crate::models::{LogEntry, LogGroup, Page, Stats};
use crate::utils::query::with_query;

impl ApiClient {
    pub async fn list_logs(&self, page: &PageRequest, filters: &LogFilters) -> Result<Page<LogEntry>, ClientError> {
        let path = with_query(endpoints::LOGS, &filters.to_query(page, true));
        self.request_with_schema(&path, &RequestOptions::get()).await
    }

    pub async fn get_log(&self, id: &str) -> Result<LogEntry, ClientError> {
        self.request_with_schema(&endpoints::log(id), &RequestOptions::get())
            .await
    }

    pub async fn log_stats(&self, project_id: &str, group_id: Option<&str>) -> Result<Stats, ClientError> {
        let path = with_query(endpoints::LOGS_STATS, &stats_query(project_id, group_id));
        self.request_with_schema(&path, &RequestOptions::get()).await
    }

    /// `filters.group_id` is ignored here.
    pub async fn list_log_groups(
        &self,
        page: &PageRequest,
        filters: &LogFilters,
    ) -> Result<Page<LogGroup>, ClientError> {
        let path = with_query(endpoints::LOG_GROUPS, &filters.to_query(page, false));
        self.request_with_schema(&path, &RequestOptions::get()).await
    }

    pub async fn get_log_group(&self, id: &str) -> Result<LogGroup, ClientError> {
        self.request_with_schema(&endpoints::log_group(id), &RequestOptions::get())
            .await
    }
}
