use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use httpmock::prelude::*;
use tower::ServiceExt;
use zone_core::{Article, ArticleStore};
use zone_newsapi::{NewsService, UpstreamClient, UpstreamConfig};
use zone_storage::MemoryStore;
use zone_web::{create_app, AppState};

fn article(url: &str, published_at: &str) -> Article {
    Article {
        id: None,
        source_name: "Example Times".to_string(),
        author: "A. Writer".to_string(),
        title: format!("title for {url}"),
        description: String::new(),
        url: url.to_string(),
        image_url: String::new(),
        published_at: published_at.to_string(),
        content: "body".to_string(),
    }
}

async fn app_with_store(base_url: &str) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let config = UpstreamConfig::new("test-key").with_base_url(base_url.to_string());
    let client = UpstreamClient::new(config).unwrap();
    let service = NewsService::new(client, store.clone());
    (create_app(AppState::new(service)), store)
}

async fn seeded_app() -> Router {
    let (app, store) = app_with_store("https://newsapi.invalid/").await;
    for day in ["01", "02", "03", "04", "05"] {
        store
            .insert(article(
                &format!("https://e.com/{day}"),
                &format!("2024-01-{day}T00:00:00Z"),
            ))
            .await
            .unwrap();
    }
    app
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn articles_are_served_newest_first() {
    let app = seeded_app().await;
    let response = app
        .oneshot(Request::builder().uri("/v1/articles?limit=2").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let articles = json.as_array().unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0]["publishedAt"], "2024-01-05T00:00:00Z");
    assert_eq!(articles[1]["publishedAt"], "2024-01-04T00:00:00Z");
}

#[tokio::test]
async fn urls_projection_returns_plain_strings() {
    let app = seeded_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/articles/urls?limit=3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!(["https://e.com/05", "https://e.com/04", "https://e.com/03"])
    );
}

#[tokio::test]
async fn negative_limit_is_a_bad_request() {
    let app = seeded_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/articles?limit=-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn find_by_url_returns_the_article_or_404() {
    let app = seeded_app().await;

    let hit = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/articles/findByUrl?url=https%3A%2F%2Fe.com%2F03")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(hit.status(), StatusCode::OK);
    let json = body_json(hit).await;
    assert_eq!(json["url"], "https://e.com/03");

    let miss = app
        .oneshot(
            Request::builder()
                .uri("/v1/articles/findByUrl?url=https%3A%2F%2Fe.com%2Fnope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(miss.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ingest_persists_and_returns_the_stored_articles() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/everything")
            .query_param("q", "climate");
        then.status(200).body(
            r#"{"status":"ok","totalResults":1,"articles":[{
                "source": {"id": null, "name": "Example Times"},
                "author": "A. Writer",
                "title": "Only",
                "description": "d",
                "url": "https://e.com/only",
                "urlToImage": null,
                "publishedAt": "2024-01-01T00:00:00Z",
                "content": "c"
            }]}"#,
        );
    });

    let (app, store) = app_with_store(&format!("{}/", server.base_url())).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/articles/ingest?query=climate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["url"], "https://e.com/only");
    assert!(store.find_by_url("https://e.com/only").await.unwrap().is_some());
}

#[tokio::test]
async fn upstream_failures_map_to_bad_gateway() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/everything");
        then.status(200).body("<html>definitely not json</html>");
    });

    let (app, _store) = app_with_store(&format!("{}/", server.base_url())).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/articles/ingest?query=climate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
