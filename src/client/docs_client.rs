use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{DocId, DocumentationRecord, GenerateDocRequest};

const API_PREFIX: [&str; 2] = ["api", "docs"];

/// Typed access to the documentation backend's REST contract.
///
/// Every failure is handed back to the caller as-is; the client never retries.
#[derive(Clone, Debug)]
pub struct DocsClient {
    base_url: Url,
    client: reqwest::Client,
}

impl DocsClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("doc-toolkit/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
        })
    }

    /// `GET /api/docs/test`. The payload is passed through untouched.
    pub async fn health(&self) -> ClientResult<serde_json::Value> {
        let url = self.endpoint(&["test"])?;
        self.fetch_json(Method::GET, url, None).await
    }

    /// Submits a snippet for documentation and returns the stored record.
    ///
    /// Blank fields are rejected locally without a round trip. The backend
    /// regenerates in place when the project/endpoint pair already exists, so
    /// the returned id is not necessarily new.
    pub async fn generate(
        &self,
        request: &GenerateDocRequest,
    ) -> ClientResult<DocumentationRecord> {
        if let Some(field) = request.first_blank_field() {
            return Err(ClientError::InvalidInput(field));
        }

        let url = self.endpoint(&["generate"])?;
        debug!(
            %url,
            project = %request.project_name,
            endpoint = %request.api_endpoint,
            "POST generate"
        );

        let response = self.client.post(url).json(request).send().await;
        let body = self.read_body(response, None).await?;
        let record: DocumentationRecord = serde_json::from_str(&body)?;

        info!(id = record.id, project = %record.project_name, "documentation generated");
        Ok(record)
    }

    /// Every record the backend holds, in backend order.
    pub async fn list_all(&self) -> ClientResult<Vec<DocumentationRecord>> {
        let url = self.endpoint(&["all"])?;
        let records: Vec<DocumentationRecord> = self.fetch_json(Method::GET, url, None).await?;
        debug!(count = records.len(), "fetched all documentation");
        Ok(records)
    }

    /// Records whose project name equals `project_name` exactly.
    pub async fn list_by_project(
        &self,
        project_name: &str,
    ) -> ClientResult<Vec<DocumentationRecord>> {
        if project_name.is_empty() {
            return Err(ClientError::InvalidInput("projectName"));
        }

        let url = self.endpoint(&["project", project_name])?;
        let records: Vec<DocumentationRecord> = self.fetch_json(Method::GET, url, None).await?;
        debug!(
            project = project_name,
            count = records.len(),
            "fetched project documentation"
        );
        Ok(records)
    }

    pub async fn list_project_names(&self) -> ClientResult<Vec<String>> {
        let url = self.endpoint(&["projects"])?;
        self.fetch_json(Method::GET, url, None).await
    }

    pub async fn get_by_id(&self, id: DocId) -> ClientResult<DocumentationRecord> {
        let url = self.endpoint(&[&id.to_string()])?;
        self.fetch_json(Method::GET, url, Some(id)).await
    }

    /// Permanently removes a record. An unknown id surfaces as `NotFound`.
    pub async fn delete(&self, id: DocId) -> ClientResult<()> {
        let url = self.endpoint(&[&id.to_string()])?;
        debug!(%url, "DELETE documentation");

        let response = self.client.delete(url).send().await;
        self.read_body(response, Some(id)).await?;

        info!(id, "documentation deleted");
        Ok(())
    }

    /// Appends `/api/docs/<segments..>` to the base URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::RequestFailed {
                status: None,
                message: format!("base URL {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(API_PREFIX.iter().chain(segments));
        Ok(url)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        id: Option<DocId>,
    ) -> ClientResult<T> {
        debug!(%method, %url, "request");
        let response = self.client.request(method, url).send().await;
        let body = self.read_body(response, id).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Maps transport errors and non-2xx statuses into `ClientError`.
    ///
    /// `id` marks an id-addressed route, where a 404 means the record is gone.
    async fn read_body(
        &self,
        response: reqwest::Result<reqwest::Response>,
        id: Option<DocId>,
    ) -> ClientResult<String> {
        let response = response.map_err(|e| {
            warn!(error = %e, "documentation backend unreachable");
            ClientError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        warn!(status = status.as_u16(), "documentation backend returned an error");
        match (status, id) {
            (StatusCode::NOT_FOUND, Some(id)) => Err(ClientError::NotFound(id)),
            _ => Err(ClientError::from_response(status.as_u16(), &body)),
        }
    }
}
