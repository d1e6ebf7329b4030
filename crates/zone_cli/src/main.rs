use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use futures::TryStreamExt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zone_core::ArticleStore;
use zone_newsapi::{
    NewsService, UpstreamClient, UpstreamConfig, DEFAULT_BASE_URL, DEFAULT_INGEST_PARALLELISM,
    DEFAULT_SCAN_LIMIT,
};
use zone_storage::{JsonFileStore, MemoryStore, SqliteStore};
use zone_web::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StorageKind {
    Memory,
    Sqlite,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "zone-news", version, about = "News ingest service with a newest-first read API")]
struct Cli {
    /// Storage backend for the article collection
    #[arg(long, value_enum, default_value_t = StorageKind::Sqlite)]
    storage: StorageKind,

    /// Path of the sqlite database or json article file
    /// (defaults: articles.db / articles.json)
    #[arg(long)]
    store_path: Option<PathBuf>,

    /// NewsAPI credential; never logged
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Upstream origin
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Upstream request deadline in seconds
    #[arg(long, default_value_t = 10)]
    http_timeout: u64,

    /// Max store inserts in flight during an ingest run
    #[arg(long, default_value_t = DEFAULT_INGEST_PARALLELISM)]
    ingest_parallelism: usize,

    /// Cap applied to read endpoints when no limit is supplied
    #[arg(long, default_value_t = DEFAULT_SCAN_LIMIT)]
    scan_default_limit: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        listen: SocketAddr,
    },
    /// Fetch articles matching a query once and store them
    Ingest { query: String },
    /// Parse a pre-fetched upstream response payload and store its articles
    Import { file: PathBuf },
    /// Print recently published articles, newest first
    Recent {
        #[arg(long, default_value_t = 100)]
        limit: u32,
        /// Print only article urls
        #[arg(long)]
        urls: bool,
    },
}

impl Cli {
    fn store_path(&self) -> PathBuf {
        match (&self.store_path, self.storage) {
            (Some(path), _) => path.clone(),
            (None, StorageKind::Json) => PathBuf::from("articles.json"),
            _ => PathBuf::from("articles.db"),
        }
    }

    async fn build_store(&self) -> anyhow::Result<Arc<dyn ArticleStore>> {
        Ok(match self.storage {
            StorageKind::Memory => Arc::new(MemoryStore::new()),
            StorageKind::Sqlite => Arc::new(
                SqliteStore::connect(&self.store_path())
                    .await
                    .context("opening sqlite store")?,
            ),
            StorageKind::Json => Arc::new(JsonFileStore::new(self.store_path())),
        })
    }

    fn build_service(&self, store: Arc<dyn ArticleStore>) -> anyhow::Result<NewsService> {
        let needs_key = matches!(self.command, Command::Serve { .. } | Command::Ingest { .. });
        let api_key = match &self.api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ if needs_key => bail!("missing API key: pass --api-key or set NEWS_API_KEY"),
            _ => String::new(),
        };

        let config = UpstreamConfig::new(api_key)
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.http_timeout));
        let client = UpstreamClient::new(config)?;
        Ok(NewsService::new(client, store)
            .with_parallelism(self.ingest_parallelism)
            .with_default_limit(self.scan_default_limit))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let store = cli.build_store().await?;
    let service = cli.build_service(store)?;

    match &cli.command {
        Command::Serve { listen } => {
            let app = zone_web::create_app(AppState::new(service));
            let listener = tokio::net::TcpListener::bind(listen)
                .await
                .with_context(|| format!("binding {listen}"))?;
            info!(%listen, "serving article API");
            axum::serve(listener, app).await?;
        }
        Command::Ingest { query } => {
            let mut stream = service.ingest(query).await?;
            let mut stored = 0usize;
            while let Some(article) = stream.try_next().await? {
                println!("{}  {}", article.published_at, article.url);
                stored += 1;
            }
            info!(%query, stored, "ingest complete");
        }
        Command::Import { file } => {
            let payload = std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            let mut stream = service.import_payload(&payload)?;
            let mut stored = 0usize;
            while let Some(article) = stream.try_next().await? {
                println!("{}  {}", article.published_at, article.url);
                stored += 1;
            }
            info!(file = %file.display(), stored, "import complete");
        }
        Command::Recent { limit, urls } => {
            let limit = Some(*limit as usize);
            if *urls {
                let mut stream = service.urls(limit).await?;
                while let Some(url) = stream.try_next().await? {
                    println!("{url}");
                }
            } else {
                let mut stream = service.articles(limit).await?;
                while let Some(article) = stream.try_next().await? {
                    println!("{}  {} ({})", article.published_at, article.title, article.url);
                }
            }
        }
    }

    Ok(())
}
