use tracing::info;

use crate::db::models::{Comment, Post, User};
use crate::db::operations::DbOperations;
use crate::error::{AppError, DatabaseError};
use crate::Result;

/// A post composed with its comments; kept as a distinct result type
/// rather than a loose map.
#[derive(Debug)]
pub struct PostWithComments {
    pub post: Post,
    pub comments: Vec<Comment>,
}

pub struct PostService {
    db: DbOperations,
}

impl PostService {
    pub fn new(db: DbOperations) -> Self {
        Self { db }
    }

    /// Persist a post, stamping the author when one is supplied.
    pub async fn create_post(&self, body: &str, author: Option<&User>) -> Result<Post> {
        info!("Creating a post");
        self.db.create_post(body, author.map(|u| u.id)).await
    }

    pub async fn get_post(&self, post_id: i64) -> Result<Post> {
        self.db
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        self.db.list_posts().await
    }

    /// The referenced post must exist at creation time; on `NotFound`
    /// nothing is written (the check and the insert share a transaction
    /// in the data layer).
    pub async fn create_comment(
        &self,
        post_id: i64,
        body: &str,
        author: Option<&User>,
    ) -> Result<Comment> {
        info!("Adding comment to post {}", post_id);
        match self
            .db
            .create_comment(post_id, body, author.map(|u| u.id))
            .await
        {
            Err(AppError::DatabaseError(DatabaseError::NotFound)) => {
                Err(AppError::NotFound("Post not found".to_string()))
            }
            other => other,
        }
    }

    /// 404 when the post is absent; an existing post with no comments
    /// yields an empty list. Results are filtered to the requested post id
    /// in case a broader query ever returns extra rows.
    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.get_post(post_id).await?;

        let comments = self.db.list_comments(post_id).await?;
        Ok(comments
            .into_iter()
            .filter(|comment| comment.post_id == post_id)
            .collect())
    }

    /// Composed read; the existence check short-circuits so a nonexistent
    /// post never returns a partial structure.
    pub async fn get_post_with_comments(&self, post_id: i64) -> Result<PostWithComments> {
        let post = self.get_post(post_id).await?;
        let comments = self.list_comments(post_id).await?;
        Ok(PostWithComments { post, comments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn setup() -> (PostService, DbOperations) {
        let db = DbOperations::new_with_options("sqlite::memory:", 1, Duration::from_secs(5))
            .await
            .expect("Failed to open in-memory database");

        sqlx::migrate!("./migrations")
            .run(db.pool())
            .await
            .expect("Failed to run migrations");

        (PostService::new(db.clone()), db)
    }

    async fn setup_service() -> PostService {
        setup().await.0
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let posts = setup_service().await;

        let created = posts.create_post("Test Post", None).await.unwrap();
        let fetched = posts.get_post(created.id).await.unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.body, "Test Post");
    }

    #[tokio::test]
    async fn test_get_missing_post_is_not_found() {
        let posts = setup_service().await;
        let err = posts.get_post(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_comment_on_missing_post_writes_nothing() {
        let posts = setup_service().await;
        let post = posts.create_post("Test Post", None).await.unwrap();

        let err = posts
            .create_comment(post.id + 1, "Test Comment", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let comments = posts.list_comments(post.id).await.unwrap();
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn test_empty_comments_is_empty_list_not_error() {
        let posts = setup_service().await;
        let post = posts.create_post("Test Post", None).await.unwrap();

        let comments = posts.list_comments(post.id).await.unwrap();
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn test_list_comments_missing_post_is_not_found() {
        let posts = setup_service().await;
        let err = posts.list_comments(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_post_with_comments_composition() {
        let posts = setup_service().await;

        let post = posts.create_post("Test Post", None).await.unwrap();
        let comment = posts
            .create_comment(post.id, "Test Comment", None)
            .await
            .unwrap();

        let composed = posts.get_post_with_comments(post.id).await.unwrap();
        assert_eq!(composed.post.id, post.id);
        assert_eq!(composed.comments.len(), 1);
        assert_eq!(composed.comments[0].id, comment.id);
        assert_eq!(composed.comments[0].post_id, post.id);
    }

    #[tokio::test]
    async fn test_post_with_comments_missing_post() {
        let posts = setup_service().await;
        let err = posts.get_post_with_comments(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_author_is_stamped() {
        let (posts, db) = setup().await;
        let author = db
            .create_user("testuser@testuser.com", "hash")
            .await
            .unwrap();

        let post = posts.create_post("Test Post", Some(&author)).await.unwrap();
        assert_eq!(post.user_id, Some(author.id));

        let comment = posts
            .create_comment(post.id, "Test Comment", Some(&author))
            .await
            .unwrap();
        assert_eq!(comment.user_id, Some(author.id));
    }
}
