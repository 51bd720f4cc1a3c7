use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::db::models::{Comment, Post};
use crate::posts::PostWithComments;
use crate::AppState;
use crate::Result;

#[derive(Debug, Deserialize)]
pub struct PostIn {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct PostOut {
    pub id: i64,
    pub body: String,
}

impl From<Post> for PostOut {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            body: post.body,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentIn {
    pub post_id: i64,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct CommentOut {
    pub id: i64,
    pub post_id: i64,
    pub body: String,
}

impl From<Comment> for CommentOut {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            body: comment.body,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostWithCommentsOut {
    pub post: PostOut,
    pub comments: Vec<CommentOut>,
}

impl From<PostWithComments> for PostWithCommentsOut {
    fn from(composed: PostWithComments) -> Self {
        Self {
            post: composed.post.into(),
            comments: composed.comments.into_iter().map(CommentOut::from).collect(),
        }
    }
}

/// GET /
pub async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    info!("Getting all posts");
    let posts = state.posts.list_posts().await?;
    let posts: Vec<PostOut> = posts.into_iter().map(PostOut::from).collect();
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /post (protected)
pub async fn create_post(
    req: web::Json<PostIn>,
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let post = state.posts.create_post(&req.body, Some(&user.0)).await?;
    Ok(HttpResponse::Created().json(PostOut::from(post)))
}

/// GET /post/{post_id}/no-comments
pub async fn get_post(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    info!("Getting a post without comments");
    let post = state.posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostOut::from(post)))
}

/// POST /comment (protected)
pub async fn create_comment(
    req: web::Json<CommentIn>,
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let comment = state
        .posts
        .create_comment(req.post_id, &req.body, Some(&user.0))
        .await?;
    Ok(HttpResponse::Created().json(CommentOut::from(comment)))
}

/// GET /post/{post_id}/comment
pub async fn list_comments(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    info!("Getting comments on post");
    let comments = state.posts.list_comments(path.into_inner()).await?;
    let comments: Vec<CommentOut> = comments.into_iter().map(CommentOut::from).collect();
    Ok(HttpResponse::Ok().json(comments))
}

/// GET /post/{post_id}
pub async fn get_post_with_comments(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    info!("Getting post with comments");
    let composed = state
        .posts
        .get_post_with_comments(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(PostWithCommentsOut::from(composed)))
}
