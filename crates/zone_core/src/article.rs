use serde::{Deserialize, Serialize};

/// Canonical article record as stored and served by this system.
///
/// `published_at` is kept as the upstream ISO-8601 string and ordered
/// lexicographically, which matches chronological order for the UTC
/// `Z`-suffixed timestamps the upstream emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Store-assigned identifier, absent until the first successful insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source_name: String,
    pub author: String,
    pub title: String,
    pub description: String,
    /// Uniqueness key across the collection, taken verbatim from upstream.
    pub url: String,
    pub image_url: String,
    pub published_at: String,
    pub content: String,
}

impl Article {
    /// True once the store has accepted this record.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
