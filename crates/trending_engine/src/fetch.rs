use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, USER_AGENT};
use trending_core::{Category, Host};

use crate::{FailureKind, FetchError, FetchOutput};

/// Responses are cut off after this many bytes.
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub scheme: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(20),
            max_bytes: DEFAULT_MAX_BYTES,
            user_agent: "neodb-trending-history-bot".to_string(),
        }
    }
}

impl FetchSettings {
    pub fn trending_url(&self, host: &Host, category: &Category) -> String {
        format!("{}://{host}/api/trending/{category}/", self.scheme)
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, host: &Host, category: &Category) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::RequestBuild, err.to_string()))
    }

    fn build_request(
        &self,
        client: &reqwest::Client,
        url: &str,
    ) -> Result<reqwest::Request, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::RequestBuild, err.to_string()))?;
        let mut builder = client.get(parsed).header(ACCEPT, "application/json");
        if !self.settings.user_agent.is_empty() {
            builder = builder.header(USER_AGENT, self.settings.user_agent.as_str());
        }
        builder
            .build()
            .map_err(|err| FetchError::new(FailureKind::RequestBuild, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, host: &Host, category: &Category) -> Result<FetchOutput, FetchError> {
        let url = self.settings.trending_url(host, category);
        let client = self.build_client()?;
        let request = self.build_request(&client, &url)?;

        let response = client.execute(request).await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            // Body is dropped unread.
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = usize::try_from(self.settings.max_bytes).unwrap_or(usize::MAX);
        let mut bytes = Vec::new();
        let mut truncated = false;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_body_error)?;
            let room = max_bytes - bytes.len();
            if chunk.len() > room {
                bytes.extend_from_slice(&chunk[..room]);
                truncated = true;
                break;
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchOutput {
            url,
            bytes,
            truncated,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return FetchError::new(FailureKind::RequestBuild, err.to_string());
    }
    FetchError::new(FailureKind::Transport, err.to_string())
}

fn map_body_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::BodyRead, err.to_string())
}
