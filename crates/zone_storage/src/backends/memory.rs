use async_trait::async_trait;
use futures::stream;
use tokio::sync::RwLock;
use zone_core::{Article, ArticleStore, ArticleStream, Error, Result};

use super::{assign_id, newest_first};

/// In-memory store, used for tests and as the zero-setup backend.
#[derive(Default)]
pub struct MemoryStore {
    articles: RwLock<Vec<Article>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn insert(&self, article: Article) -> Result<Article> {
        let mut articles = self.articles.write().await;
        if articles.iter().any(|a| a.url == article.url) {
            return Err(Error::DuplicateUrl(article.url));
        }
        let stored = assign_id(article);
        articles.push(stored.clone());
        Ok(stored)
    }

    async fn scan_recent(&self, limit: usize) -> Result<ArticleStream> {
        let mut snapshot = self.articles.read().await.clone();
        snapshot.sort_by(newest_first);
        snapshot.truncate(limit);
        Ok(Box::pin(stream::iter(snapshot.into_iter().map(Ok))))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Article>> {
        let articles = self.articles.read().await;
        Ok(articles.iter().find(|a| a.url == url).cloned())
    }
}
