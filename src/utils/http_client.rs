use async_trait::async_trait;
use reqwest::{Client, Response, header};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppError, AppResult, SourceError};

/// Minimal HTTP GET used by the remote corpus source and the synergy client
#[async_trait]
pub trait HttpFetch: Send + Sync + std::fmt::Debug {
    /// Fetch URL and return the raw response body; non-success statuses are errors
    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>>;
}

/// Fetch URL and parse the body as JSON
pub async fn fetch_json<T: DeserializeOwned>(
    http: &dyn HttpFetch,
    url: &str,
    source_type: &str,
) -> AppResult<T> {
    let bytes = http.fetch_bytes(url).await?;
    let value = serde_json::from_slice(&bytes).map_err(|e| {
        SourceError::parse_error(source_type, format!("Failed to parse JSON from {url}: {e}"))
    })?;
    debug!("Successfully fetched and parsed JSON content from {}", url);
    Ok(value)
}

/// Default implementation of HttpFetch using reqwest
#[derive(Debug, Clone)]
pub struct StandardHttpClient {
    client: Client,
}

impl StandardHttpClient {
    /// Create new HTTP client with only connection timeout (no total request timeout)
    /// so the multi-megabyte corpus download is never cut short
    pub fn new(user_agent: &str, connect_timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self { client })
    }

    async fn process_response_to_bytes(response: Response, url: &str) -> AppResult<Vec<u8>> {
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                message: format!(
                    "{} - URL: {}",
                    status.canonical_reason().unwrap_or("Unknown"),
                    url
                ),
            }
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::unreachable(url, format!("Failed to read response: {e}")))?;

        debug!("Fetched {} bytes of content", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl HttpFetch for StandardHttpClient {
    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        debug!("Fetching content from: {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| -> AppError { SourceError::unreachable(url, e.to_string()).into() })?;

        Self::process_response_to_bytes(response, url).await
    }
}
