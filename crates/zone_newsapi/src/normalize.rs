use zone_core::Article;

use crate::upstream::RawArticle;

/// Map a raw upstream record to the canonical article shape.
///
/// Pure and deterministic: the nested source object is flattened, absent
/// fields become empty strings, and the url is taken verbatim since it is
/// the uniqueness key. No id is assigned here.
pub fn normalize(raw: RawArticle) -> Article {
    Article {
        id: None,
        source_name: raw.source.name.unwrap_or_default(),
        author: raw.author.unwrap_or_default(),
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        url: raw.url.unwrap_or_default(),
        image_url: raw.url_to_image.unwrap_or_default(),
        published_at: raw.published_at.unwrap_or_default(),
        content: raw.content.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::RawSource;

    #[test]
    fn flattens_source_and_copies_fields() {
        let raw = RawArticle {
            source: RawSource {
                id: Some("ex".to_string()),
                name: Some("Example Times".to_string()),
            },
            author: Some("A. Writer".to_string()),
            title: Some("Title".to_string()),
            description: Some("Desc".to_string()),
            url: Some("https://example.com/1".to_string()),
            url_to_image: Some("https://example.com/1.png".to_string()),
            published_at: Some("2024-01-01T00:00:00Z".to_string()),
            content: Some("Body".to_string()),
        };

        let article = normalize(raw);
        assert_eq!(article.id, None);
        assert_eq!(article.source_name, "Example Times");
        assert_eq!(article.author, "A. Writer");
        assert_eq!(article.url, "https://example.com/1");
        assert_eq!(article.image_url, "https://example.com/1.png");
        assert_eq!(article.published_at, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn absent_fields_become_empty_strings() {
        let raw = RawArticle {
            source: RawSource::default(),
            author: None,
            title: None,
            description: None,
            url: None,
            url_to_image: None,
            published_at: None,
            content: None,
        };

        let article = normalize(raw);
        assert_eq!(article.source_name, "");
        assert_eq!(article.image_url, "");
        assert_eq!(article.url, "");
    }

    #[test]
    fn does_not_touch_the_url() {
        let raw = RawArticle {
            source: RawSource::default(),
            author: None,
            title: None,
            description: None,
            url: Some("HTTPS://Example.com/A?utm=1 ".to_string()),
            url_to_image: None,
            published_at: None,
            content: None,
        };

        // No trimming, no case folding, no canonicalization.
        assert_eq!(normalize(raw).url, "HTTPS://Example.com/A?utm=1 ");
    }
}
