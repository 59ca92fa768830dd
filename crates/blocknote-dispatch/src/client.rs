//! HTTP clients for the generation and summarization endpoints.
//!
//! The traits are the seam the dispatcher depends on; tests swap in
//! in-memory implementations.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::DispatchError;
use crate::wire::{
    ErrorBody, GenerateRequest, GenerateResponse, SummarizeKind, SummarizeRequest,
    SummarizeResponse,
};

/// Source of generated blocks for a prompt.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send one prompt and return the endpoint's block batch unvalidated.
    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, DispatchError>;
}

/// Source of summaries for a piece of markdown.
#[async_trait]
pub trait SummarizeClient: Send + Sync {
    async fn summarize(&self, content: &str, kind: SummarizeKind)
    -> Result<String, DispatchError>;
}

/// Shared reqwest plumbing for both endpoints.
#[derive(Debug, Clone)]
struct Endpoint {
    client: reqwest::Client,
    base: String,
}

impl Endpoint {
    fn new(config: &ClientConfig) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DispatchError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, DispatchError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base, path);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => match body.details {
                    Some(details) => format!("{} ({})", body.error, details),
                    None => body.error,
                },
                Err(_) => text,
            };
            return Err(DispatchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| DispatchError::Malformed(e.to_string()))
    }
}

/// [`GenerationClient`] that posts to `{endpoint}/api/generate`.
#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    endpoint: Endpoint,
}

impl HttpGenerationClient {
    pub fn new(config: &ClientConfig) -> Result<Self, DispatchError> {
        Ok(Self {
            endpoint: Endpoint::new(config)?,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.endpoint.base
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, DispatchError> {
        let body = GenerateRequest {
            prompt: prompt.to_string(),
        };
        self.endpoint.post("/api/generate", &body).await
    }
}

/// [`SummarizeClient`] that posts to `{endpoint}/api/summarize`.
#[derive(Debug, Clone)]
pub struct HttpSummarizeClient {
    endpoint: Endpoint,
}

impl HttpSummarizeClient {
    pub fn new(config: &ClientConfig) -> Result<Self, DispatchError> {
        Ok(Self {
            endpoint: Endpoint::new(config)?,
        })
    }
}

#[async_trait]
impl SummarizeClient for HttpSummarizeClient {
    async fn summarize(
        &self,
        content: &str,
        kind: SummarizeKind,
    ) -> Result<String, DispatchError> {
        if content.trim().is_empty() {
            return Err(DispatchError::EmptyContent);
        }
        let body = SummarizeRequest {
            content: content.to_string(),
            kind,
        };
        let response: SummarizeResponse = self.endpoint.post("/api/summarize", &body).await?;
        Ok(response.summary)
    }
}
