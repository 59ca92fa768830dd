//! Minimal client for Google's Gemini `generateContent` API.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use blocknote_dispatch::GeminiConfig;

use crate::BackendError;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini client bound to one model.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, api_key: impl Into<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Http(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Credentials go in [`Self::headers`]; the URL carries none.
    fn build_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn headers(&self) -> Result<HeaderMap, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| BackendError::Http("API key is not a valid header value".to_string()))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }

    /// Send one user turn and return the first candidate's text.
    pub async fn complete(&self, text: String) -> Result<String, BackendError> {
        let headers = self.headers()?;
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart { text }],
            }],
        };

        let response = self
            .client
            .post(self.build_url())
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Http(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Http(e.without_url().to_string()))?;
        if !status.is_success() {
            return Err(BackendError::Response(format!("HTTP {status}: {text}")));
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| BackendError::Serialization(e.to_string()))?;
        if let Some(error) = parsed.error {
            return Err(BackendError::Response(format!(
                "Gemini API error: {}",
                error.message
            )));
        }

        parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| BackendError::Response("No content in response".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_goes_in_header_not_url() {
        let config = GeminiConfig {
            endpoint: "https://example.test/v1beta/".into(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config, "k3y").unwrap();
        assert_eq!(
            client.build_url(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
        let headers = client.headers().unwrap();
        assert_eq!(headers[API_KEY_HEADER], "k3y");
        assert!(headers[API_KEY_HEADER].is_sensitive());
    }

    #[tokio::test]
    async fn test_transport_error_omits_key() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = GeminiConfig {
            endpoint: format!("http://{addr}/v1beta"),
            ..Default::default()
        };
        let client = GeminiClient::new(&config, "SUPERSECRETKEY").unwrap();
        let err = client.complete("hi".into()).await.unwrap_err();
        assert!(matches!(err, BackendError::Http(_)));
        assert!(!err.to_string().contains("SUPERSECRETKEY"));
    }

    #[test]
    fn test_debug_hides_key() {
        let client = GeminiClient::new(&GeminiConfig::default(), "secret").unwrap();
        assert!(!format!("{client:?}").contains("secret"));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"hel"},{"text":"lo"}]}}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(json).unwrap();
        let text: String = parsed.candidates.unwrap()[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "hello");
    }
}
