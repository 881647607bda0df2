//! In-memory repository
//!
//! Backs `--storage memory` and the test suites. Everything lives behind a
//! single `RwLock`, so a cascading delete is one critical section.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Comment, Like, Post};
use super::{RepoError, Repository};

#[derive(Default)]
struct Collections {
    /// Stored without their joined comments/likes
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
}

/// Repository over process-local collections
#[derive(Default)]
pub struct MemoryRepository {
    inner: RwLock<Collections>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored comments, including orphans.
    pub async fn comment_count(&self) -> usize {
        self.inner.read().await.comments.len()
    }

    /// Number of stored likes, including orphans.
    pub async fn like_count(&self) -> usize {
        self.inner.read().await.likes.len()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get_posts(&self) -> Result<Vec<Post>, RepoError> {
        let inner = self.inner.read().await;

        // Stable sorts keep insertion order for equal timestamps
        let mut posts = inner.posts.clone();
        posts.sort_by_key(|p| p.created_at);

        let mut comments = inner.comments.clone();
        comments.sort_by_key(|c| c.created_at);

        let mut likes = inner.likes.clone();
        likes.sort_by_key(|l| l.created_at);

        for post in &mut posts {
            post.comments = comments
                .iter()
                .filter(|c| c.post_id == post.id)
                .cloned()
                .collect();
            post.likes = likes
                .iter()
                .filter(|l| l.post_id == post.id)
                .cloned()
                .collect();
        }

        Ok(posts)
    }

    async fn create_post(&self, mut post: Post) -> Result<(), RepoError> {
        post.comments.clear();
        post.likes.clear();
        self.inner.write().await.posts.push(post);
        Ok(())
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;

        let before = inner.posts.len();
        inner.posts.retain(|p| p.id != post_id);
        if inner.posts.len() == before {
            return Err(RepoError::not_found("post", post_id));
        }

        inner.comments.retain(|c| c.post_id != post_id);
        inner.likes.retain(|l| l.post_id != post_id);
        Ok(())
    }

    async fn create_comment(&self, comment: Comment) -> Result<(), RepoError> {
        self.inner.write().await.comments.push(comment);
        Ok(())
    }

    async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;

        let before = inner.comments.len();
        inner
            .comments
            .retain(|c| !(c.id == comment_id && c.post_id == post_id));
        if inner.comments.len() == before {
            return Err(RepoError::not_found("comment", comment_id));
        }
        Ok(())
    }

    async fn create_like(&self, like: Like) -> Result<Like, RepoError> {
        let mut inner = self.inner.write().await;

        // One like per principal per post, matching the Postgres unique index
        if let Some(existing) = inner
            .likes
            .iter()
            .find(|l| l.post_id == like.post_id && l.user_id == like.user_id)
        {
            return Ok(existing.clone());
        }

        inner.likes.push(like.clone());
        Ok(like)
    }

    async fn delete_like(&self, post_id: Uuid, like_id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;

        let before = inner.likes.len();
        inner
            .likes
            .retain(|l| !(l.id == like_id && l.post_id == post_id));
        if inner.likes.len() == before {
            return Err(RepoError::not_found("like", like_id));
        }
        Ok(())
    }

    async fn find_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Like>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner
            .likes
            .iter()
            .find(|l| l.post_id == post_id && l.user_id == user_id)
            .cloned())
    }
}
