//! Post endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{PostId, ValidJson};
use crate::http::server::AppState;
use crate::models::{Audio, Post};

/// Create post request.
///
/// Only `audio` is read; client-supplied `id` or `created_at` are ignored.
#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub audio: Option<String>,
}

/// GET /posts - all posts, oldest first
async fn list_posts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.service.list_posts().await?;
    Ok(Json(posts))
}

/// POST /posts - create a post
async fn create_post(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let audio = Audio::new(req.audio.as_deref())?;
    let post = state.service.create_post(audio).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// DELETE /posts/{id} - delete a post with its comments and likes
async fn delete_post(
    State(state): State<Arc<AppState>>,
    PostId(post_id): PostId,
) -> Result<StatusCode, ApiError> {
    state.service.delete_post(post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", delete(delete_post))
}
