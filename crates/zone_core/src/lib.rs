pub mod article;
pub mod error;
pub mod store;

pub use article::Article;
pub use error::Error;
pub use store::{ArticleStore, ArticleStream};

pub type Result<T> = std::result::Result<T, Error>;
