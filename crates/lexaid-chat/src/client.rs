//! Client for the remote legal Q&A service.

use std::time::Duration;

use async_trait::async_trait;
use lexaid_core::config::ServiceConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::ChatError;
use crate::types::{AskRequest, AskResponse, DocumentList, HealthResponse};

/// Maximum number of characters of an error body kept in `ChatError::Status`.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Something that can answer a question.
#[async_trait]
pub trait AskService: Send + Sync {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ChatError>;
}

/// HTTP implementation of [`AskService`].
pub struct HttpAskClient {
    client: Client,
    base_url: String,
}

impl HttpAskClient {
    /// Build a client targeting `base_url` with a whole-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Transport(format!("failed to build HTTP client: {}", e)))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, ChatError> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    /// Origin every request is sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthResponse, ChatError> {
        self.get_json("/health").await
    }

    /// `GET /api/documents`.
    pub async fn documents(&self) -> Result<DocumentList, ChatError> {
        self.get_json("/api/documents").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChatError> {
        let response = self.client.get(self.url(path)).send().await?;
        read_json(response).await
    }
}

#[async_trait]
impl AskService for HttpAskClient {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ChatError> {
        let url = self.url("/api/ask");
        tracing::debug!(url = %url, top_k = request.top_k, "Sending question");
        let response = self.client.post(url).json(request).send().await?;
        read_json(response).await
    }
}

/// Map a response to `T`, treating non-2xx statuses and undecodable bodies
/// as errors.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ChatError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ChatError::Status {
            status: status.as_u16(),
            body: truncate(&body, MAX_ERROR_BODY_CHARS),
        });
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ChatError::MalformedResponse(e.to_string()))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
