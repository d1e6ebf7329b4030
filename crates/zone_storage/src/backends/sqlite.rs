use std::path::Path;

use async_trait::async_trait;
use futures::stream;
use futures::TryStreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::info;
use zone_core::{Article, ArticleStore, ArticleStream, Error, Result};

use super::assign_id;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        source_name TEXT NOT NULL,
        author TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        url TEXT NOT NULL UNIQUE,
        image_url TEXT NOT NULL,
        published_at TEXT NOT NULL,
        content TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

const SCAN_SQL: &str = r#"
    SELECT id, source_name, author, title, description, url, image_url, published_at, content
    FROM articles
    ORDER BY published_at DESC, url ASC
    LIMIT ? OFFSET ?
"#;

/// Rows fetched per scan page, so large collections are streamed rather
/// than materialized.
const SCAN_PAGE: i64 = 64;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(store_err)?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::StoreUnavailable(format!("migration {i} failed: {e}")))?;
        }

        info!(path = %db_path.display(), "opened sqlite article store");
        Ok(Self { pool })
    }
}

#[async_trait]
impl ArticleStore for SqliteStore {
    async fn insert(&self, article: Article) -> Result<Article> {
        let stored = assign_id(article);
        sqlx::query(
            r#"
            INSERT INTO articles
            (id, source_name, author, title, description, url, image_url, published_at, content)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(stored.id.as_deref())
        .bind(&stored.source_name)
        .bind(&stored.author)
        .bind(&stored.title)
        .bind(&stored.description)
        .bind(&stored.url)
        .bind(&stored.image_url)
        .bind(&stored.published_at)
        .bind(&stored.content)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::DuplicateUrl(stored.url.clone())
            }
            _ => store_err(e),
        })?;

        Ok(stored)
    }

    async fn scan_recent(&self, limit: usize) -> Result<ArticleStream> {
        let pool = self.pool.clone();
        let pages = stream::try_unfold(
            (pool, 0i64, limit as i64),
            |(pool, offset, remaining)| async move {
                if remaining <= 0 {
                    return Ok::<_, Error>(None);
                }
                let page = remaining.min(SCAN_PAGE);
                let rows = sqlx::query(SCAN_SQL)
                    .bind(page)
                    .bind(offset)
                    .fetch_all(&pool)
                    .await
                    .map_err(store_err)?;
                if rows.is_empty() {
                    return Ok(None);
                }
                let fetched = rows.len() as i64;
                let articles: Vec<Result<Article>> =
                    rows.iter().map(|row| Ok(row_to_article(row))).collect();
                Ok(Some((
                    stream::iter(articles),
                    (pool, offset + fetched, remaining - fetched),
                )))
            },
        )
        .try_flatten();

        Ok(Box::pin(pages))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Article>> {
        let row = sqlx::query(
            r#"
            SELECT id, source_name, author, title, description, url, image_url, published_at, content
            FROM articles
            WHERE url = ?
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.as_ref().map(row_to_article))
    }
}

fn store_err(e: sqlx::Error) -> Error {
    Error::StoreUnavailable(e.to_string())
}

fn row_to_article(row: &SqliteRow) -> Article {
    Article {
        id: row.get("id"),
        source_name: row.get("source_name"),
        author: row.get("author"),
        title: row.get("title"),
        description: row.get("description"),
        url: row.get("url"),
        image_url: row.get("image_url"),
        published_at: row.get("published_at"),
        content: row.get("content"),
    }
}
