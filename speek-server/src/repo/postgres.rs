//! Postgres repository
//!
//! Patterns:
//! - list: one ordered query per collection, assembled in memory (no N+1)
//! - delete: zero rows affected is reported as NotFound
//! - delete post: transaction covering the post and its children
//! - like: unique (post_id, user_id), a repeat returns the stored row

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use crate::models::{Comment, Like, Post};
use super::{RepoError, Repository};

/// Post record from database (children are joined separately)
#[derive(Debug, Clone, FromRow)]
struct PostRow {
    id: Uuid,
    audio: String,
    created_at: DateTime<Utc>,
}

/// Repository backed by a shared Postgres pool
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Repository for PgRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get_posts(&self) -> Result<Vec<Post>, RepoError> {
        const OP: &str = "get_posts";

        let rows: Vec<PostRow> = sqlx::query_as(
            r#"
            SELECT id, audio, created_at
            FROM posts
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::storage(OP, e))?;

        // Inner joins drop orphans left by unchecked comment/like inserts
        let comment_rows = sqlx::query(
            r#"
            SELECT c.id, c.post_id, c.audio, c.created_at
            FROM comments c
            JOIN posts p ON p.id = c.post_id
            ORDER BY c.created_at ASC, c.seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::storage(OP, e))?;

        let like_rows = sqlx::query(
            r#"
            SELECT l.id, l.post_id, l.user_id, l.created_at
            FROM likes l
            JOIN posts p ON p.id = l.post_id
            ORDER BY l.created_at ASC, l.seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::storage(OP, e))?;

        let mut comments: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for r in comment_rows {
            let comment = Comment {
                id: r.get("id"),
                post_id: r.get("post_id"),
                audio: r.get("audio"),
                created_at: r.get("created_at"),
            };
            comments.entry(comment.post_id).or_default().push(comment);
        }

        let mut likes: HashMap<Uuid, Vec<Like>> = HashMap::new();
        for r in like_rows {
            let like = Like {
                id: r.get("id"),
                post_id: r.get("post_id"),
                user_id: r.get("user_id"),
                created_at: r.get("created_at"),
            };
            likes.entry(like.post_id).or_default().push(like);
        }

        let posts = rows
            .into_iter()
            .map(|r| Post {
                comments: comments.remove(&r.id).unwrap_or_default(),
                likes: likes.remove(&r.id).unwrap_or_default(),
                id: r.id,
                audio: r.audio,
                created_at: r.created_at,
            })
            .collect();

        Ok(posts)
    }

    async fn create_post(&self, post: Post) -> Result<(), RepoError> {
        sqlx::query("INSERT INTO posts (id, audio, created_at) VALUES ($1, $2, $3)")
            .bind(post.id)
            .bind(&post.audio)
            .bind(post.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::storage("create_post", e))?;
        Ok(())
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        const OP: &str = "delete_post";

        let mut tx = self.pool.begin().await.map_err(|e| RepoError::storage(OP, e))?;

        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::storage(OP, e))?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(RepoError::not_found("post", post_id));
        }

        sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::storage(OP, e))?;

        sqlx::query("DELETE FROM likes WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::storage(OP, e))?;

        tx.commit().await.map_err(|e| RepoError::storage(OP, e))?;
        Ok(())
    }

    async fn create_comment(&self, comment: Comment) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, audio, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(&comment.audio)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::storage("create_comment", e))?;
        Ok(())
    }

    async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND post_id = $2")
            .bind(comment_id)
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::storage("delete_comment", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("comment", comment_id));
        }
        Ok(())
    }

    async fn create_like(&self, like: Like) -> Result<Like, RepoError> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let row = sqlx::query(
            r#"
            INSERT INTO likes (id, post_id, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (post_id, user_id) DO UPDATE SET post_id = EXCLUDED.post_id
            RETURNING id, post_id, user_id, created_at
            "#,
        )
        .bind(like.id)
        .bind(like.post_id)
        .bind(like.user_id)
        .bind(like.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::storage("create_like", e))?;

        Ok(Like {
            id: row.get("id"),
            post_id: row.get("post_id"),
            user_id: row.get("user_id"),
            created_at: row.get("created_at"),
        })
    }

    async fn delete_like(&self, post_id: Uuid, like_id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM likes WHERE id = $1 AND post_id = $2")
            .bind(like_id)
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::storage("delete_like", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("like", like_id));
        }
        Ok(())
    }

    async fn find_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Like>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT id, post_id, user_id, created_at
            FROM likes
            WHERE post_id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::storage("find_like", e))?;

        Ok(row.map(|r| Like {
            id: r.get("id"),
            post_id: r.get("post_id"),
            user_id: r.get("user_id"),
            created_at: r.get("created_at"),
        }))
    }
}
