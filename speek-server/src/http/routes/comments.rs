//! Comment endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{CommentPath, PostId, ValidJson};
use crate::http::server::AppState;
use crate::models::{Audio, Comment};

/// Create comment request. The owning post comes from the path only.
#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub audio: Option<String>,
}

/// POST /posts/{id}/comments - comment on a post
async fn create_comment(
    State(state): State<Arc<AppState>>,
    PostId(post_id): PostId,
    ValidJson(req): ValidJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let audio = Audio::new(req.audio.as_deref())?;
    let comment = state.service.add_comment(post_id, audio).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /posts/{id}/comments/{comment_id}
async fn delete_comment(
    State(state): State<Arc<AppState>>,
    path: CommentPath,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .delete_comment(path.post_id, path.comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Comment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts/{id}/comments", post(create_comment))
        .route("/posts/{id}/comments/{comment_id}", delete(delete_comment))
}
