use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::article::Article;
use crate::Result;

/// Lazy, single-pass sequence of articles produced by a store scan or an
/// ingest run. Dropping the stream abandons any remaining work.
pub type ArticleStream = BoxStream<'static, Result<Article>>;

/// Repository over the persisted article collection.
///
/// Implementations enforce uniqueness on `url`: a conflicting insert fails
/// with [`Error::DuplicateUrl`](crate::Error::DuplicateUrl) rather than
/// silently replacing the stored record.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Persist an article and return it with its assigned id.
    ///
    /// Callers must reject records with an empty `url` before insert.
    async fn insert(&self, article: Article) -> Result<Article>;

    /// Stream persisted articles newest-first by `published_at`
    /// (lexicographic), capped at `limit`. A limit of zero yields an
    /// empty stream.
    async fn scan_recent(&self, limit: usize) -> Result<ArticleStream>;

    /// Look up a single article by its exact url.
    async fn find_by_url(&self, url: &str) -> Result<Option<Article>>;
}
