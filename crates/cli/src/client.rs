//! Backend HTTP client

use async_trait::async_trait;
use motortest_common::{
    CatalogApi, CatalogRecord, Error, NamedOption, ProtocolField, RecordId, ReportApi, Result, StoredReport,
    TestReport,
};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;

/// Client for the MotorTest REST API
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client with default settings
    pub fn new(base_url: &str) -> Result<Self> {
        Self::from_config(&ClientConfig::default().with_api_url(Some(base_url.to_string())))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(transport)?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if the backend is healthy
    pub async fn health_check(&self) -> bool {
        self.http
            .get(self.url("/health"))
            .send()
            .await
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }

    pub async fn templates(&self) -> Result<Vec<NamedOption>> {
        fetch_json(self.http.get(self.url("/templates"))).await
    }

    pub async fn motor_types(&self) -> Result<Vec<NamedOption>> {
        fetch_json(self.http.get(self.url("/motor-types"))).await
    }

    /// Reports the backend has received
    pub async fn list_reports(&self) -> Result<Vec<StoredReport>> {
        fetch_json(self.http.get(self.url("/test-reports"))).await
    }
}

fn transport(e: reqwest::Error) -> Error {
    Error::Transport(e.to_string())
}

/// Send and turn a non-success status into `Error::Http`
async fn send(request: RequestBuilder) -> Result<reqwest::Response> {
    let response = request.send().await.map_err(transport)?;
    let status = response.status();
    debug!("{} {}", status.as_u16(), response.url());

    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
        });
    }
    Ok(response)
}

async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let body = send(request).await?.bytes().await.map_err(transport)?;
    Ok(serde_json::from_slice(&body)?)
}

async fn fetch_empty(request: RequestBuilder) -> Result<()> {
    send(request).await?;
    Ok(())
}

#[async_trait]
impl<R: CatalogRecord> CatalogApi<R> for ApiClient {
    async fn list(&self) -> Result<Vec<R>> {
        fetch_json(self.http.get(self.url(&format!("/{}", R::COLLECTION)))).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        fetch_json(self.http.post(self.url(&format!("/{}", R::COLLECTION))).json(draft)).await
    }

    async fn update(&self, record: &R) -> Result<R> {
        let path = format!("/{}/{}", R::COLLECTION, record.id());
        fetch_json(self.http.put(self.url(&path)).json(record)).await
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        fetch_empty(self.http.delete(self.url(&format!("/{}/{}", R::COLLECTION, id)))).await
    }
}

#[async_trait]
impl ReportApi for ApiClient {
    async fn protocol_fields(&self, template_id: &str, motor_type_id: &str) -> Result<Vec<ProtocolField>> {
        let mut url = Url::parse(&self.url("/protocol-fields"))
            .map_err(|e| Error::InvalidConfig(format!("bad API URL {}: {}", self.base_url, e)))?;
        url.query_pairs_mut()
            .append_pair("templateId", template_id)
            .append_pair("motorTypeId", motor_type_id);

        fetch_json(self.http.get(url)).await
    }

    async fn submit_report(&self, report: &TestReport) -> Result<()> {
        fetch_empty(self.http.post(self.url("/test-reports")).json(report)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ApiClient::new("http://127.0.0.1:8080/api/").unwrap();
        assert_eq!(client.url("/tools"), "http://127.0.0.1:8080/api/tools");
    }

    #[test]
    fn test_rejects_non_http_url() {
        assert!(matches!(ApiClient::new("ftp://host/api"), Err(Error::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{}/api", addr)).unwrap();
        let err = CatalogApi::<motortest_common::Tool>::list(&client).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(!client.health_check().await);
    }
}
