use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use super::query::{stats_query, ErrorFilters, ErrorGroupFilters, PageRequest};
use crate::client::{endpoints, ApiClient, ClientError, RequestOptions};
use crate::models::{ErrorEvent, ErrorGroup, ErrorGroupStatus, Page, Stats};
use crate::utils::query::with_query;

impl ApiClient {
    pub async fn list_errors(
        &self,
        page: &PageRequest,
        filters: &ErrorFilters,
    ) -> Result<Page<ErrorEvent>, ClientError> {
        let path = with_query(endpoints::ERRORS, &filters.to_query(page));
        self.request_with_schema(&path, &RequestOptions::get()).await
    }

    pub async fn get_error(&self, id: &str) -> Result<ErrorEvent, ClientError> {
        self.request_with_schema(&endpoints::error(id), &RequestOptions::get())
            .await
    }

    pub async fn error_stats(&self, project_id: &str, group_id: Option<&str>) -> Result<Stats, ClientError> {
        let path = with_query(endpoints::ERRORS_STATS, &stats_query(project_id, group_id));
        self.request_with_schema(&path, &RequestOptions::get()).await
    }

    pub async fn list_error_groups(
        &self,
        page: &PageRequest,
        filters: &ErrorGroupFilters,
    ) -> Result<Page<ErrorGroup>, ClientError> {
        let path = with_query(endpoints::ERROR_GROUPS, &filters.to_query(page));
        self.request_with_schema(&path, &RequestOptions::get()).await
    }

    pub async fn get_error_group(&self, id: &str) -> Result<ErrorGroup, ClientError> {
        self.request_with_schema(&endpoints::error_group(id), &RequestOptions::get())
            .await
    }

    pub async fn update_error_group_status(&self, id: &str, status: ErrorGroupStatus) -> Result<(), ClientError> {
        debug!(group_id = id, status = %status, "updating error group status");
        let options = RequestOptions::json(Method::PATCH, &json!({ "status": status }))?;
        self.request_void(&endpoints::error_group_status(id), &options)
            .await
    }

    /// Sets `status` on every group in `ids` with one call. An empty `ids`
    /// is rejected without touching the network.
    pub async fn batch_update_error_group_status(
        &self,
        ids: &[String],
        status: ErrorGroupStatus,
    ) -> Result<(), ClientError> {
        if ids.is_empty() {
            return Err(ClientError::Configuration(
                "batch status update needs at least one group id".to_string(),
            ));
        }
        info!(count = ids.len(), status = %status, "updating error group statuses");
        let options = RequestOptions::json(Method::POST, &json!({ "ids": ids, "status": status }))?;
        self.request_void(endpoints::ERROR_GROUPS_STATUS_BATCH, &options)
            .await
    }
}
