use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::TryStreamExt;
use serde::Deserialize;
use tracing::info;
use zone_core::{Article, Error};

use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
pub struct IngestParams {
    query: String,
}

#[derive(Deserialize)]
pub struct LimitParams {
    limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct UrlParams {
    url: String,
}

/// Limits arrive signed so that negative values can be rejected with a
/// 400 instead of a deserialization failure.
fn checked_limit(limit: Option<i64>) -> Result<Option<usize>, ApiError> {
    match limit {
        None => Ok(None),
        Some(n) if n < 0 => Err(ApiError::from(Error::InvalidArgument(format!(
            "limit must be non-negative, got {n}"
        )))),
        Some(n) => Ok(Some(n as usize)),
    }
}

pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IngestParams>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let stream = state.service.ingest(&params.query).await?;
    let articles: Vec<Article> = stream.try_collect().await?;
    info!(query = %params.query, stored = articles.len(), "ingest complete");
    Ok(Json(articles))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let limit = checked_limit(params.limit)?;
    let articles: Vec<Article> = state.service.articles(limit).await?.try_collect().await?;
    Ok(Json(articles))
}

pub async fn list_urls(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let limit = checked_limit(params.limit)?;
    let urls: Vec<String> = state.service.urls(limit).await?.try_collect().await?;
    Ok(Json(urls))
}

pub async fn find_by_url(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UrlParams>,
) -> Result<Response, ApiError> {
    match state.service.find_by_url(&params.url).await? {
        Some(article) => Ok(Json(article).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "article not found" })),
        )
            .into_response()),
    }
}
