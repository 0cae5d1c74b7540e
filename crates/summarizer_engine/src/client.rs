use std::time::{Duration, Instant};

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use summarizer_logging::{app_debug, app_info, app_warn};

use crate::types::SummaryRequest;
use crate::{FailureKind, RequestError, SummaryPayload};

/// Path of the extraction endpoint, relative to [`ClientSettings::endpoint`].
pub const EXTRACT_PATH: &str = "/extract-news";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL of the summarization service, e.g. `http://127.0.0.1:5000`.
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            // Extraction plus summarization routinely takes tens of seconds.
            request_timeout: Duration::from_secs(120),
            max_response_bytes: 8 * 1024 * 1024,
        }
    }
}

impl ClientSettings {
    pub fn extract_url(&self) -> Result<reqwest::Url, RequestError> {
        let joined = format!("{}{}", self.endpoint.trim_end_matches('/'), EXTRACT_PATH);
        reqwest::Url::parse(&joined)
            .map_err(|err| RequestError::new(FailureKind::InvalidEndpoint, err.to_string()))
    }
}

#[async_trait::async_trait]
pub trait SummaryClient: Send + Sync {
    /// Ask the service to extract and summarize the article at `url`.
    async fn summarize(&self, url: &str) -> Result<SummaryPayload, RequestError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSummaryClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestSummaryClient {
    pub fn new(settings: ClientSettings) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, RequestError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(RequestError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(RequestError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl SummaryClient for ReqwestSummaryClient {
    async fn summarize(&self, url: &str) -> Result<SummaryPayload, RequestError> {
        let endpoint = self.settings.extract_url()?;
        let body = serde_json::to_vec(&SummaryRequest { url })
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;

        app_info!("POST {} url_len={}", endpoint, url.len());
        let started = Instant::now();

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            app_warn!(
                "Summarization service answered {} after {:?}",
                status,
                started.elapsed()
            );
            return Err(RequestError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = self.read_body(response).await?;
        app_debug!(
            "Received {} bytes in {:?}",
            bytes.len(),
            started.elapsed()
        );

        serde_json::from_slice::<SummaryPayload>(&bytes)
            .map_err(|err| RequestError::new(FailureKind::MalformedBody, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::new(FailureKind::Timeout, err.to_string());
    }
    RequestError::new(FailureKind::Network, err.to_string())
}
