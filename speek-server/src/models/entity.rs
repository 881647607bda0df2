//! Post, comment and like entities
//!
//! Entities are immutable once created: there is no update path. The
//! constructors are the only place identifiers and creation timestamps are
//! assigned, so client input can never supply either.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Audio;

/// An audio post with its comments and likes joined in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub audio: String,
    pub created_at: DateTime<Utc>,
    /// Append order (ascending `created_at`)
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub likes: Vec<Like>,
}

impl Post {
    /// Build a new post with a fresh identifier.
    pub fn new(audio: Audio, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            audio: audio.into_string(),
            created_at,
            comments: Vec::new(),
            likes: Vec::new(),
        }
    }
}

/// An audio reply attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub audio: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a new comment. `post_id` comes from the request path.
    pub fn new(post_id: Uuid, audio: Audio, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            audio: audio.into_string(),
            created_at,
        }
    }
}

/// A principal's like on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub post_id: Uuid,
    /// Principal who owns the like; resolves which like an unlike removes
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(post_id: Uuid, user_id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            created_at,
        }
    }
}
