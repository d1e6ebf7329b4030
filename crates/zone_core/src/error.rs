use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Insert would violate the unique index on `url`. Swallowed by the
    /// ingest pipeline, never surfaced to callers.
    #[error("duplicate article url: {0}")]
    DuplicateUrl(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("upstream transport failure: {0}")]
    UpstreamTransport(#[from] reqwest::Error),

    #[error("upstream returned a malformed body: {0}")]
    UpstreamFormat(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Duplicate inserts are the one recoverable failure of the pipeline.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::DuplicateUrl(_))
    }
}
