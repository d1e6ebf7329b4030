pub mod normalize;
pub mod pipeline;
pub mod service;
pub mod upstream;

pub use pipeline::{IngestPipeline, DEFAULT_INGEST_PARALLELISM};
pub use service::{NewsService, DEFAULT_SCAN_LIMIT};
pub use upstream::{RawArticle, UpstreamClient, UpstreamConfig, DEFAULT_BASE_URL};
