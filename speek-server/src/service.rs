//! Feed service - orchestration between validated input and the repository
//!
//! Assigns identifiers and timestamps, resolves the principal's like for
//! unlike, and bounds each operation's storage work with the request deadline. A failed
//! storage call is returned immediately; nothing here retries.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Audio, Comment, Like, Post};
use crate::repo::{RepoError, Repository, StorageCause};

/// Default deadline for the storage work of one operation
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// Orchestrates post, comment and like operations
#[derive(Clone)]
pub struct FeedService {
    repo: Arc<dyn Repository>,
    deadline: Duration,
}

impl FeedService {
    pub fn new(repo: Arc<dyn Repository>, deadline: Duration) -> Self {
        Self { repo, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Name of the storage backend in use.
    pub fn backend(&self) -> &'static str {
        self.repo.backend()
    }

    /// Run one operation's storage work under the deadline; expiry cancels it.
    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, deadline = ?self.deadline, "storage deadline exceeded");
                Err(RepoError::storage(
                    operation,
                    StorageCause::DeadlineExceeded(self.deadline),
                ))
            }
        }
    }

    /// All posts, oldest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        self.bounded("get_posts", self.repo.get_posts()).await
    }

    pub async fn create_post(&self, audio: Audio) -> Result<Post, RepoError> {
        let post = Post::new(audio, Utc::now());
        self.bounded("create_post", self.repo.create_post(post.clone()))
            .await?;

        tracing::info!(post_id = %post.id, "post created");
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        self.bounded("delete_post", self.repo.delete_post(post_id))
            .await?;

        tracing::info!(%post_id, "post deleted");
        Ok(())
    }

    /// Attach a comment to `post_id`. The post's existence isn't checked.
    pub async fn add_comment(&self, post_id: Uuid, audio: Audio) -> Result<Comment, RepoError> {
        let comment = Comment::new(post_id, audio, Utc::now());
        self.bounded("create_comment", self.repo.create_comment(comment.clone()))
            .await?;

        tracing::info!(%post_id, comment_id = %comment.id, "comment created");
        Ok(comment)
    }

    pub async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        self.bounded("delete_comment", self.repo.delete_comment(post_id, comment_id))
            .await?;

        tracing::info!(%post_id, %comment_id, "comment deleted");
        Ok(())
    }

    /// Like a post as `user_id`; liking twice returns the existing like.
    ///
    /// The store decides which like wins, so concurrent duplicates all
    /// receive the persisted row.
    pub async fn like_post(&self, post_id: Uuid, user_id: Uuid) -> Result<Like, RepoError> {
        let candidate = Like::new(post_id, user_id, Utc::now());
        let candidate_id = candidate.id;
        let like = self
            .bounded("create_like", self.repo.create_like(candidate))
            .await?;

        if like.id == candidate_id {
            tracing::info!(%post_id, %user_id, like_id = %like.id, "like created");
        } else {
            tracing::debug!(%post_id, %user_id, like_id = %like.id, "post already liked");
        }
        Ok(like)
    }

    /// Remove the like `user_id` holds on `post_id`.
    ///
    /// Lookup and delete share one deadline.
    pub async fn unlike_post(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let like_id = self
            .bounded("unlike_post", async {
                let like = self.repo.find_like(post_id, user_id).await?.ok_or_else(|| {
                    RepoError::NotFound {
                        resource: "like",
                        id: format!("{}/{}", post_id, user_id),
                    }
                })?;
                self.repo.delete_like(post_id, like.id).await?;
                Ok::<_, RepoError>(like.id)
            })
            .await?;

        tracing::info!(%post_id, %user_id, %like_id, "like deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MemoryRepository;
    use async_trait::async_trait;
    use tokio::sync::Barrier;

    fn audio(s: &str) -> Audio {
        Audio::new(Some(s)).unwrap()
    }

    fn service() -> FeedService {
        FeedService::new(Arc::new(MemoryRepository::new()), DEFAULT_DEADLINE)
    }

    /// Repository whose calls never complete
    struct Stalled;

    #[async_trait]
    impl Repository for Stalled {
        fn backend(&self) -> &'static str {
            "stalled"
        }
        async fn get_posts(&self) -> Result<Vec<Post>, RepoError> {
            std::future::pending().await
        }
        async fn create_post(&self, _: Post) -> Result<(), RepoError> {
            std::future::pending().await
        }
        async fn delete_post(&self, _: Uuid) -> Result<(), RepoError> {
            std::future::pending().await
        }
        async fn create_comment(&self, _: Comment) -> Result<(), RepoError> {
            std::future::pending().await
        }
        async fn delete_comment(&self, _: Uuid, _: Uuid) -> Result<(), RepoError> {
            std::future::pending().await
        }
        async fn create_like(&self, _: Like) -> Result<Like, RepoError> {
            std::future::pending().await
        }
        async fn delete_like(&self, _: Uuid, _: Uuid) -> Result<(), RepoError> {
            std::future::pending().await
        }
        async fn find_like(&self, _: Uuid, _: Uuid) -> Result<Option<Like>, RepoError> {
            std::future::pending().await
        }
    }

    /// Memory store whose like lookup and delete each take `delay`
    struct Slow {
        inner: MemoryRepository,
        delay: Duration,
    }

    #[async_trait]
    impl Repository for Slow {
        fn backend(&self) -> &'static str {
            self.inner.backend()
        }
        async fn get_posts(&self) -> Result<Vec<Post>, RepoError> {
            self.inner.get_posts().await
        }
        async fn create_post(&self, post: Post) -> Result<(), RepoError> {
            self.inner.create_post(post).await
        }
        async fn delete_post(&self, post_id: Uuid) -> Result<(), RepoError> {
            self.inner.delete_post(post_id).await
        }
        async fn create_comment(&self, comment: Comment) -> Result<(), RepoError> {
            self.inner.create_comment(comment).await
        }
        async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
            self.inner.delete_comment(post_id, comment_id).await
        }
        async fn create_like(&self, like: Like) -> Result<Like, RepoError> {
            self.inner.create_like(like).await
        }
        async fn delete_like(&self, post_id: Uuid, like_id: Uuid) -> Result<(), RepoError> {
            tokio::time::sleep(self.delay).await;
            self.inner.delete_like(post_id, like_id).await
        }
        async fn find_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Like>, RepoError> {
            tokio::time::sleep(self.delay).await;
            self.inner.find_like(post_id, user_id).await
        }
    }

    /// Memory store that holds like lookups and writes until two are in flight
    struct Lockstep {
        inner: MemoryRepository,
        barrier: Barrier,
    }

    #[async_trait]
    impl Repository for Lockstep {
        fn backend(&self) -> &'static str {
            self.inner.backend()
        }
        async fn get_posts(&self) -> Result<Vec<Post>, RepoError> {
            self.inner.get_posts().await
        }
        async fn create_post(&self, post: Post) -> Result<(), RepoError> {
            self.inner.create_post(post).await
        }
        async fn delete_post(&self, post_id: Uuid) -> Result<(), RepoError> {
            self.inner.delete_post(post_id).await
        }
        async fn create_comment(&self, comment: Comment) -> Result<(), RepoError> {
            self.inner.create_comment(comment).await
        }
        async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
            self.inner.delete_comment(post_id, comment_id).await
        }
        async fn create_like(&self, like: Like) -> Result<Like, RepoError> {
            self.barrier.wait().await;
            self.inner.create_like(like).await
        }
        async fn delete_like(&self, post_id: Uuid, like_id: Uuid) -> Result<(), RepoError> {
            self.inner.delete_like(post_id, like_id).await
        }
        async fn find_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Like>, RepoError> {
            self.barrier.wait().await;
            self.inner.find_like(post_id, user_id).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_storage_hits_deadline() {
        let service = FeedService::new(Arc::new(Stalled), Duration::from_millis(250));

        let err = service.list_posts().await.unwrap_err();
        match err {
            RepoError::Storage {
                operation,
                source: StorageCause::DeadlineExceeded(d),
            } => {
                assert_eq!(operation, "get_posts");
                assert_eq!(d, Duration::from_millis(250));
            }
            other => panic!("expected deadline error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_assigns_identity_and_time() {
        let service = service();
        let before = Utc::now();
        let post = service.create_post(audio("clip1")).await.unwrap();

        assert!(!post.id.is_nil());
        assert!(post.created_at >= before);
        assert_eq!(service.list_posts().await.unwrap(), vec![post]);
    }

    #[tokio::test]
    async fn like_twice_keeps_one_like() {
        let service = service();
        let post = service.create_post(audio("clip1")).await.unwrap();
        let user = Uuid::new_v4();

        let first = service.like_post(post.id, user).await.unwrap();
        let second = service.like_post(post.id, user).await.unwrap();
        assert_eq!(first.id, second.id);

        let posts = service.list_posts().await.unwrap();
        assert_eq!(posts[0].likes.len(), 1);
    }

    #[tokio::test]
    async fn unlike_removes_only_the_principals_like() {
        let service = service();
        let post = service.create_post(audio("clip1")).await.unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        service.like_post(post.id, alice).await.unwrap();
        let bobs = service.like_post(post.id, bob).await.unwrap();

        service.unlike_post(post.id, alice).await.unwrap();

        let posts = service.list_posts().await.unwrap();
        assert_eq!(posts[0].likes, vec![bobs]);
    }

    #[tokio::test]
    async fn unlike_without_like_is_not_found() {
        let service = service();
        let post = service.create_post(audio("clip1")).await.unwrap();

        let err = service.unlike_post(post.id, Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn concurrent_likes_return_the_stored_like() {
        let repo = Arc::new(Lockstep {
            inner: MemoryRepository::new(),
            barrier: Barrier::new(2),
        });
        let service = FeedService::new(repo.clone(), DEFAULT_DEADLINE);
        let (post_id, user_id) = (Uuid::new_v4(), Uuid::new_v4());

        let (a, b) = tokio::join!(
            service.like_post(post_id, user_id),
            service.like_post(post_id, user_id)
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.id, b.id);
        assert_eq!(repo.inner.like_count().await, 1);
        let stored = repo.inner.find_like(post_id, user_id).await.unwrap();
        assert_eq!(stored, Some(a));
    }

    #[tokio::test(start_paused = true)]
    async fn unlike_shares_one_deadline() {
        let deadline = Duration::from_millis(500);
        let repo = Arc::new(Slow {
            inner: MemoryRepository::new(),
            delay: deadline.mul_f32(0.6),
        });
        let service = FeedService::new(repo.clone(), deadline);
        let (post_id, user_id) = (Uuid::new_v4(), Uuid::new_v4());
        service.like_post(post_id, user_id).await.unwrap();

        // Each call fits the deadline on its own, the pair doesn't
        let err = service.unlike_post(post_id, user_id).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Storage {
                operation: "unlike_post",
                source: StorageCause::DeadlineExceeded(_),
            }
        ));
    }
}
