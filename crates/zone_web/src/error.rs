use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;
use zone_core::Error;

/// HTTP projection of the core error taxonomy.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::UpstreamTransport(_) | Error::UpstreamFormat(_) => StatusCode::BAD_GATEWAY,
            Error::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            // DuplicateUrl is swallowed by the pipeline and Io stays
            // internal; neither should reach a handler.
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(status = %status, error = %self.0, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
