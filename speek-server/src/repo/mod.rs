//! Repository capability - the single seam between request handling and storage
//!
//! Each backend implements [`Repository`]; the backend is chosen once at
//! startup and injected as `Arc<dyn Repository>`.
//!
//! Shared semantics across backends:
//! - Reads are ordered by ascending `created_at`, ties by insertion order
//! - Deletes that match nothing return [`RepoError::NotFound`]
//! - Deleting a post also deletes its comments and likes
//! - Comments and likes are accepted for posts that don't exist; reads
//!   never surface them

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Comment, Like, Post};

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Repository error type
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("storage error during {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: StorageCause,
    },
}

impl RepoError {
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn storage(operation: &'static str, source: impl Into<StorageCause>) -> Self {
        Self::Storage {
            operation,
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Underlying cause of a storage failure
#[derive(Debug, thiserror::Error)]
pub enum StorageCause {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("{0}")]
    Unavailable(String),
}

/// Persistence capability for posts, comments and likes.
///
/// There is deliberately no update operation: entities are created and
/// deleted, never mutated.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Short backend name, reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// All posts, oldest first, with comments and likes joined in.
    async fn get_posts(&self) -> Result<Vec<Post>, RepoError>;

    /// Persist a post whose `id` and `created_at` are already assigned.
    async fn create_post(&self, post: Post) -> Result<(), RepoError>;

    /// Delete a post together with its comments and likes.
    async fn delete_post(&self, post_id: Uuid) -> Result<(), RepoError>;

    /// Persist a comment. The parent post isn't checked.
    async fn create_comment(&self, comment: Comment) -> Result<(), RepoError>;

    async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError>;

    /// Persist a like and return the stored row. The parent post isn't checked.
    ///
    /// A principal holds at most one like per post: when one already exists
    /// it is returned unchanged and `like` is discarded.
    async fn create_like(&self, like: Like) -> Result<Like, RepoError>;

    async fn delete_like(&self, post_id: Uuid, like_id: Uuid) -> Result<(), RepoError>;

    /// Resolve the like a principal holds on a post.
    async fn find_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Like>, RepoError>;
}
