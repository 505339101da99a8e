use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::error::{AppError, AppResult, HttpError};

use super::result::{ProbeFailure, ProbeResult};
use super::target::ProbeTarget;

/// Executes a single probe. Implementations never fail: transport problems
/// are reported through [`ProbeResult::failure`].
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, index: usize, target: &ProbeTarget) -> ProbeResult;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    /// Body bytes kept for substring checks; the rest is drained and dropped.
    pub max_body_bytes: usize,
}

pub struct HttpProbe {
    client: Client,
    max_body_bytes: usize,
}

impl HttpProbe {
    /// Builds the pooled HTTP client shared by all workers.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(settings: &ProbeSettings) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))?;
        Ok(Self {
            client,
            max_body_bytes: settings.max_body_bytes,
        })
    }

    async fn fetch(&self, url: &Url) -> Result<(u16, String), reqwest::Error> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = read_body_capped(response, self.max_body_bytes).await?;
        Ok((status, body))
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, index: usize, target: &ProbeTarget) -> ProbeResult {
        let timestamp = Utc::now();
        let start = Instant::now();
        let outcome = self.fetch(&target.url).await;
        let latency = start.elapsed();

        match outcome {
            Ok((status, body)) => ProbeResult::response(index, status, body, latency, timestamp),
            Err(err) => {
                let failure = if err.is_timeout() {
                    ProbeFailure::Timeout
                } else {
                    ProbeFailure::Transport
                };
                debug!("Probe '{}' failed: {}", target.name, err);
                ProbeResult::failed(index, failure, latency, timestamp)
            }
        }
    }
}

async fn read_body_capped(
    response: reqwest::Response,
    max_bytes: usize,
) -> Result<String, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        let remaining = max_bytes.saturating_sub(buffer.len());
        if remaining > 0 {
            let take = bytes.len().min(remaining);
            buffer.extend_from_slice(bytes.get(..take).unwrap_or_default());
        }
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
