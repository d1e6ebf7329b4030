pub mod json;
pub mod memory;
pub mod sqlite;

use zone_core::Article;

/// Newest-first ordering shared by every backend: descending
/// `published_at` with the url as a deterministic tie-break.
pub(crate) fn newest_first(a: &Article, b: &Article) -> std::cmp::Ordering {
    b.published_at
        .cmp(&a.published_at)
        .then_with(|| a.url.cmp(&b.url))
}

pub(crate) fn assign_id(mut article: Article) -> Article {
    article.id = Some(uuid::Uuid::new_v4().to_string());
    article
}
