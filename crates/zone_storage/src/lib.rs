pub mod backends;

pub use backends::json::JsonFileStore;
pub use backends::memory::MemoryStore;
pub use backends::sqlite::SqliteStore;
