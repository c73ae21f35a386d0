use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use crate::ports::{RepositoryResult, TransportError};

#[derive(Clone)]
pub struct TaskApiClient {
    client: Client,
    base_url: String,
}

impl TaskApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> RepositoryResult<Self> {
        let mut builder = Client::builder().user_agent("task-manager-cli/0.1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::new(format!("Failed to create HTTP client: {e}")))?;

        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> RepositoryResult<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        let response = Self::ensure_success(response).await?;
        let response_text = response
            .text()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        tracing::debug!("API Response: {}", response_text);

        serde_json::from_str(&response_text).map_err(|e| {
            TransportError::new(format!(
                "Failed to parse response: {e}. Response was: {response_text}"
            ))
        })
    }

    pub async fn post<R: serde::Serialize>(&self, path: &str, body: &R) -> RepositoryResult<()> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        Self::ensure_success(response).await.map(|_| ())
    }

    pub async fn put<R: serde::Serialize>(&self, path: &str, body: &R) -> RepositoryResult<()> {
        let url = self.url(path);
        tracing::debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        Self::ensure_success(response).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> RepositoryResult<()> {
        let url = self.url(path);
        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        Self::ensure_success(response).await.map(|_| ())
    }

    // Any non-2xx is a failure; the body is only kept for the log line.
    async fn ensure_success(response: Response) -> RepositoryResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::debug!("API error body: {}", error_text);
        Err(TransportError::new(format!("HTTP {status}")))
    }
}
