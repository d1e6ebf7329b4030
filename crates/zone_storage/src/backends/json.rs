use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;
use tracing::debug;
use zone_core::{Article, ArticleStore, ArticleStream, Error, Result};

use super::{assign_id, newest_first};

/// File-backed store: a single JSON array of articles, rewritten on every
/// insert. The unique index of the database backends is emulated with a
/// url check under the write lock.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Article>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::StoreUnavailable(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )))
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            Error::StoreUnavailable(format!("corrupt article file {}: {e}", self.path.display()))
        })
    }

    fn write_all(&self, articles: &[Article]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(articles).map_err(|e| {
            Error::StoreUnavailable(format!("cannot encode article file: {e}"))
        })?;
        // Write-then-rename so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, bytes).map_err(|e| {
            Error::StoreUnavailable(format!("cannot write {}: {e}", tmp.display()))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            Error::StoreUnavailable(format!("cannot replace {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl ArticleStore for JsonFileStore {
    async fn insert(&self, article: Article) -> Result<Article> {
        let _guard = self.lock.lock().await;
        let mut articles = self.read_all()?;
        if articles.iter().any(|a| a.url == article.url) {
            return Err(Error::DuplicateUrl(article.url));
        }
        let stored = assign_id(article);
        articles.push(stored.clone());
        self.write_all(&articles)?;
        debug!(url = %stored.url, total = articles.len(), "appended article to file store");
        Ok(stored)
    }

    async fn scan_recent(&self, limit: usize) -> Result<ArticleStream> {
        let _guard = self.lock.lock().await;
        let mut articles = self.read_all()?;
        articles.sort_by(newest_first);
        articles.truncate(limit);
        Ok(Box::pin(stream::iter(articles.into_iter().map(Ok))))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Article>> {
        let _guard = self.lock.lock().await;
        let articles = self.read_all()?;
        Ok(articles.into_iter().find(|a| a.url == url))
    }
}
