//! HTTP surface: the two form endpoints, the post API and the feed.

mod posts;
mod submissions;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::error::SubmissionError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route(
            "/api/contact",
            post(submissions::contact_handler).get(method_not_allowed),
        )
        .route(
            "/api/evaluation",
            post(submissions::evaluation_handler).get(method_not_allowed),
        )
        .route("/api/posts", get(posts::list_posts_handler))
        .route("/api/posts/:slug", get(posts::get_post_handler))
        .route("/api/posts/:slug/related", get(posts::related_posts_handler))
        .route("/api/categories", get(posts::categories_handler))
        .route("/rss.xml", get(posts::rss_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) fn validation_response(details: Vec<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Validation failed", "details": details })),
    )
        .into_response()
}

/// Map a submission failure to a response. Storage and internal errors are
/// logged here and replaced by `opaque_message` on the wire.
pub(crate) fn submission_error_response(err: SubmissionError, opaque_message: &str) -> Response {
    match err {
        SubmissionError::Validation(details) => validation_response(details),
        other => {
            log::error!("Submission failed: {}", other);
            let status =
                StatusCode::from_u16(other.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            error_response(status, opaque_message)
        }
    }
}
