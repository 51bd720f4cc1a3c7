use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

use crate::db::models::{Comment, Post, User};
use crate::error::{AppError, DatabaseError};
use crate::Result;

/// Data access layer over the shared connection pool.
///
/// The pool is acquired once at startup and shared across all request
/// handlers; `DbOperations` is cheap to clone.
#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<SqlitePool>,
}

impl DbOperations {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| {
                AppError::DatabaseError(DatabaseError::ConnectionError(e.to_string()))
            })?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // Users

    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password) VALUES (?, ?) RETURNING id, email, password",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, password FROM users ORDER BY id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(users)
    }

    // Posts

    pub async fn create_post(&self, body: &str, user_id: Option<i64>) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (body, user_id) VALUES (?, ?) RETURNING id, body, user_id",
        )
        .bind(body)
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(post)
    }

    pub async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, body, user_id FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(post)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT id, body, user_id FROM posts ORDER BY id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(posts)
    }

    // Comments

    /// Existence check and insert run inside one transaction, so a comment
    /// is never written for a post that disappears between the two
    /// statements.
    pub async fn create_comment(
        &self,
        post_id: i64,
        body: &str,
        user_id: Option<i64>,
    ) -> Result<Comment> {
        let mut transaction = self.pool.as_ref().begin().await?;

        let post: Option<(i64,)> = sqlx::query_as("SELECT id FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&mut *transaction)
            .await?;

        if post.is_none() {
            transaction.rollback().await?;
            return Err(AppError::DatabaseError(DatabaseError::NotFound));
        }

        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, body, user_id) VALUES (?, ?, ?) \
             RETURNING id, post_id, body, user_id",
        )
        .bind(post_id)
        .bind(body)
        .bind(user_id)
        .fetch_one(&mut *transaction)
        .await?;

        transaction.commit().await?;

        Ok(comment)
    }

    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, body, user_id FROM comments WHERE post_id = ? ORDER BY id",
        )
        .bind(post_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_db() -> DbOperations {
        let db = DbOperations::new_with_options(
            "sqlite::memory:",
            1,
            Duration::from_secs(5),
        )
        .await
        .expect("Failed to open in-memory database");

        sqlx::migrate!("./migrations")
            .run(db.pool.as_ref())
            .await
            .expect("Failed to run migrations");

        db
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let db = setup_test_db().await;

        let user = db
            .create_user("test@example.com", "hashed")
            .await
            .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.email, "test@example.com");

        let found = db.get_user_by_email("test@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);

        let missing = db.get_user_by_email("other@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = setup_test_db().await;

        db.create_user("test@example.com", "hashed").await.unwrap();
        let err = db
            .create_user("test@example.com", "other-hash")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::DatabaseError(DatabaseError::Duplicate)
        ));
    }

    #[tokio::test]
    async fn test_post_round_trip() {
        let db = setup_test_db().await;

        let post = db.create_post("Test Post", None).await.unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(post.body, "Test Post");
        assert_eq!(post.user_id, None);

        let found = db.get_post(post.id).await.unwrap().unwrap();
        assert_eq!(found.id, post.id);
        assert_eq!(found.body, "Test Post");

        let all = db.list_posts().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_comment_requires_existing_post() {
        let db = setup_test_db().await;

        let err = db.create_comment(42, "orphan", None).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::DatabaseError(DatabaseError::NotFound)
        ));

        // The rolled-back transaction must leave no row behind.
        let comments = db.list_comments(42).await.unwrap();
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn test_comments_filtered_by_post() {
        let db = setup_test_db().await;

        let first = db.create_post("first", None).await.unwrap();
        let second = db.create_post("second", None).await.unwrap();
        db.create_comment(first.id, "on first", None).await.unwrap();
        db.create_comment(second.id, "on second", None).await.unwrap();

        let comments = db.list_comments(first.id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].body, "on first");
        assert_eq!(comments[0].post_id, first.id);
    }
}
