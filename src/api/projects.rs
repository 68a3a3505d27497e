use reqwest::Method;
use serde_json::json;
use tracing::debug;

use super::query::{page_query, PageRequest};
use crate::client::{endpoints, ApiClient, ClientError, RequestOptions};
use crate::models::{Dsn, Page, Project, ProjectInput};
use crate::utils::query::with_query;

impl ApiClient {
    pub async fn list_projects(&self, page: &PageRequest) -> Result<Page<Project>, ClientError> {
        let path = with_query(endpoints::PROJECTS, &page_query(page));
        self.request_with_schema(&path, &RequestOptions::get()).await
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, ClientError> {
        self.request_with_schema(&endpoints::project(id), &RequestOptions::get())
            .await
    }

    /// Creation only takes the name; a technology is attached with
    /// [`ApiClient::update_project`].
    pub async fn create_project(&self, input: &ProjectInput) -> Result<Project, ClientError> {
        debug!(name = %input.name, "creating project");
        let options = RequestOptions::json(Method::POST, &json!({ "name": input.name }))?;
        self.request_json(endpoints::PROJECTS, &options).await
    }

    pub async fn update_project(&self, id: &str, input: &ProjectInput) -> Result<Project, ClientError> {
        let options = RequestOptions::json(Method::PUT, input)?;
        self.request_json(&endpoints::project(id), &options).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ClientError> {
        debug!(project_id = id, "deleting project");
        self.request_void(&endpoints::project(id), &RequestOptions::delete())
            .await
    }

    pub async fn project_dsn(&self, id: &str) -> Result<Dsn, ClientError> {
        self.request_with_schema(&endpoints::project_dsn(id), &RequestOptions::get())
            .await
    }
}
