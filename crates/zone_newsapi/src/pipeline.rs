use std::sync::Arc;

use futures::future;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use zone_core::{ArticleStore, ArticleStream, Error, Result};

use crate::normalize::normalize;
use crate::upstream::{parse_envelope, RawArticle, UpstreamClient};

/// Bound on store inserts in flight per ingest run.
pub const DEFAULT_INGEST_PARALLELISM: usize = 8;

/// Streams upstream records through normalization into the store and
/// emits the successfully persisted articles in upstream order.
pub struct IngestPipeline {
    client: UpstreamClient,
    store: Arc<dyn ArticleStore>,
    parallelism: usize,
}

impl IngestPipeline {
    pub fn new(client: UpstreamClient, store: Arc<dyn ArticleStore>) -> Self {
        Self {
            client,
            store,
            parallelism: DEFAULT_INGEST_PARALLELISM,
        }
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Fetch one page of upstream results for `query` and persist it.
    pub async fn ingest(&self, query: &str) -> Result<ArticleStream> {
        let raw = self.client.fetch(query).await?;
        info!(query, fetched = raw.len(), "starting ingest");
        Ok(self.persist(raw))
    }

    /// Persist the articles of a pre-fetched upstream response payload.
    /// Same flow as [`ingest`](Self::ingest) minus the HTTP round trip.
    pub fn ingest_payload(&self, payload: &str) -> Result<ArticleStream> {
        let envelope = parse_envelope(payload)?;
        if envelope.status != "ok" {
            info!(status = %envelope.status, "payload reported non-ok status, nothing to ingest");
            return Ok(Box::pin(stream::empty()));
        }
        info!(fetched = envelope.articles.len(), "starting payload import");
        Ok(self.persist(envelope.articles))
    }

    /// Normalize, drop records without a url, insert with bounded
    /// parallelism and emit in input order. `buffered` keeps at most
    /// `parallelism` inserts in flight and already yields results in the
    /// order the futures were queued, so no explicit reordering is needed.
    /// Duplicates are logged and dropped; the first other error ends the
    /// stream.
    fn persist(&self, raw: Vec<RawArticle>) -> ArticleStream {
        let store = self.store.clone();
        let stream = stream::iter(raw)
            .map(normalize)
            .filter(|article| future::ready(!article.url.is_empty()))
            .map(move |article| {
                let store = store.clone();
                async move { store.insert(article).await }
            })
            .buffered(self.parallelism)
            .filter_map(|outcome| {
                future::ready(match outcome {
                    Ok(article) => Some(Ok(article)),
                    Err(Error::DuplicateUrl(url)) => {
                        warn!(%url, "duplicate article, skipping");
                        None
                    }
                    Err(err) => Some(Err(err)),
                })
            })
            .scan(false, |failed, item| {
                if *failed {
                    return future::ready(None);
                }
                *failed = item.is_err();
                future::ready(Some(item))
            });
        Box::pin(stream)
    }
}
