//! HTTP client for API requests

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use super::ExchangeConfig;
use crate::errors::{GatewayError, GatewayResult};
use crate::signing::SignedRequest;

/// HTTP 메서드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sends a prepared request and returns the parsed JSON body.
///
/// Adapters depend on this trait only, so tests can replay canned responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &SignedRequest) -> GatewayResult<Value>;
}

/// HTTP 클라이언트
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// 새로운 HTTP 클라이언트 생성
    pub fn new(base_url: impl Into<String>, config: &ExchangeConfig) -> GatewayResult<Self> {
        let base_url = config
            .hostname()
            .map(String::from)
            .unwrap_or_else(|| base_url.into());
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms()))
            .build()
            .map_err(|e| GatewayError::NetworkError {
                url: base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn status_error(status: StatusCode, url: String, body: &str) -> GatewayError {
        let message = format!("HTTP {status}: {url} {body}");
        match status.as_u16() {
            401 | 403 => GatewayError::AuthenticationError { message },
            404 => GatewayError::BadResponse { message },
            429 => GatewayError::RateLimitExceeded {
                message,
                retry_after_ms: None,
            },
            500..=599 => GatewayError::ExchangeNotAvailable { message },
            _ => GatewayError::ExchangeError { message },
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: &SignedRequest) -> GatewayResult<Value> {
        let url = format!("{}{}", self.base_url, request.path_and_query());

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = &request.body {
            builder = builder
                .header("Content-Type", "application/json")
                .body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, url, &text));
        }
        if text.trim().is_empty() {
            return Err(GatewayError::NullResponse { url });
        }

        serde_json::from_str(&text).map_err(|e| GatewayError::ParseError {
            data_type: "json".into(),
            message: format!("{url}: {e}"),
        })
    }
}
