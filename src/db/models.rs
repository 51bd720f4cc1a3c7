use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account. `password` holds the salted argon2 hash,
/// never the plaintext; public responses use projections that drop it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
}

/// `user_id` is the stamped author; nullable so the schema also covers
/// anonymous posts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub body: String,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub body: String,
    pub user_id: Option<i64>,
}
