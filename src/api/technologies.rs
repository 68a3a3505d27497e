use crate::client::{endpoints, ApiClient, ClientError, RequestOptions};
use crate::models::{Page, Technology};

impl ApiClient {
    pub async fn list_technologies(&self) -> Result<Page<Technology>, ClientError> {
        self.request_with_schema(endpoints::TECHNOLOGIES, &RequestOptions::get())
            .await
    }

    pub async fn get_technology(&self, id: i64) -> Result<Technology, ClientError> {
        self.request_with_schema(&endpoints::technology(id), &RequestOptions::get())
            .await
    }
}
