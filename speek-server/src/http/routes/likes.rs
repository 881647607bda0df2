//! Like endpoints
//!
//! The acting principal comes from the `X-User-Id` header; it decides which
//! like an unlike removes.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::{PostId, Principal};
use crate::http::server::AppState;
use crate::models::Like;

/// POST /posts/{id}/like - like a post (repeat likes are no-ops)
async fn like_post(
    State(state): State<Arc<AppState>>,
    PostId(post_id): PostId,
    Principal(user_id): Principal,
) -> Result<(StatusCode, Json<Like>), ApiError> {
    let like = state.service.like_post(post_id, user_id).await?;
    Ok((StatusCode::CREATED, Json(like)))
}

/// DELETE /posts/{id}/like - remove the principal's like
async fn unlike_post(
    State(state): State<Arc<AppState>>,
    PostId(post_id): PostId,
    Principal(user_id): Principal,
) -> Result<StatusCode, ApiError> {
    state.service.unlike_post(post_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Like routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/posts/{id}/like", post(like_post).delete(unlike_post))
}
