use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};
use url::Url;
use zone_core::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Response envelope of the `everything` endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default, rename = "totalResults")]
    pub total_results: u32,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// One article exactly as the upstream emits it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub source: RawSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "urlToImage")]
    pub url_to_image: Option<String>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Parse a response body into the envelope. Shared between the live
/// client and the pre-fetched payload import path.
pub fn parse_envelope(body: &str) -> Result<Envelope> {
    serde_json::from_str(body).map_err(|e| Error::UpstreamFormat(e.to_string()))
}

#[derive(Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
    pub http_timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}

// The api key is a credential and must never reach the logs.
impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// Stateless client for the upstream news aggregator. One call, one GET,
/// no pagination, no retries.
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::InvalidArgument(format!("invalid upstream base url: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Fetch all raw articles matching `query` from a single response page.
    ///
    /// A non-`ok` envelope yields an empty list without error; a body that
    /// does not parse as the envelope fails with `UpstreamFormat`.
    pub async fn fetch(&self, query: &str) -> Result<Vec<RawArticle>> {
        let endpoint = self
            .base_url
            .join("everything")
            .map_err(|e| Error::InvalidArgument(format!("invalid upstream base url: {e}")))?;

        debug!(%query, "querying upstream");
        let response = self
            .http
            .get(endpoint)
            .query(&[("q", query), ("apiKey", self.api_key.as_str())])
            .send()
            .await?;
        let body = response.text().await?;

        let envelope = parse_envelope(&body)?;
        if envelope.status != "ok" {
            info!(status = %envelope.status, "upstream reported non-ok status, nothing to ingest");
            return Ok(Vec::new());
        }
        debug!(
            total_results = envelope.total_results,
            returned = envelope.articles.len(),
            "upstream response parsed"
        );
        Ok(envelope.articles)
    }
}
