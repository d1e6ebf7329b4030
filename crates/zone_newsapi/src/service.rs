use std::sync::Arc;

use futures::stream::BoxStream;
use futures::TryStreamExt;
use zone_core::{Article, ArticleStore, ArticleStream, Error, Result};

use crate::pipeline::IngestPipeline;
use crate::upstream::UpstreamClient;

/// Cap applied to read projections when the caller does not supply one.
pub const DEFAULT_SCAN_LIMIT: usize = 100;

/// Front door of the crate: the ingest pipeline plus the stateless read
/// projections over the store.
pub struct NewsService {
    pipeline: IngestPipeline,
    store: Arc<dyn ArticleStore>,
    default_limit: usize,
}

impl NewsService {
    pub fn new(client: UpstreamClient, store: Arc<dyn ArticleStore>) -> Self {
        Self {
            pipeline: IngestPipeline::new(client, store.clone()),
            store,
            default_limit: DEFAULT_SCAN_LIMIT,
        }
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.pipeline = self.pipeline.with_parallelism(parallelism);
        self
    }

    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }

    /// Trigger one ingest run for `query`.
    pub async fn ingest(&self, query: &str) -> Result<ArticleStream> {
        if query.trim().is_empty() {
            return Err(Error::InvalidArgument("query must not be empty".to_string()));
        }
        self.pipeline.ingest(query).await
    }

    /// Persist the articles of a pre-fetched upstream response payload.
    pub fn import_payload(&self, payload: &str) -> Result<ArticleStream> {
        self.pipeline.ingest_payload(payload)
    }

    /// Newest-first articles, capped at `limit` (default 100).
    pub async fn articles(&self, limit: Option<usize>) -> Result<ArticleStream> {
        self.store
            .scan_recent(limit.unwrap_or(self.default_limit))
            .await
    }

    /// Newest-first article urls, capped at `limit` (default 100).
    pub async fn urls(&self, limit: Option<usize>) -> Result<BoxStream<'static, Result<String>>> {
        let articles = self.articles(limit).await?;
        Ok(Box::pin(articles.map_ok(|article| article.url)))
    }

    pub async fn find_by_url(&self, url: &str) -> Result<Option<Article>> {
        if url.is_empty() {
            return Err(Error::InvalidArgument("url must not be empty".to_string()));
        }
        self.store.find_by_url(url).await
    }
}
