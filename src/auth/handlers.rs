use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::db::models::User;
use crate::AppState;
use crate::Result;

#[derive(Debug, Deserialize)]
pub struct UserIn {
    pub email: String,
    pub password: String,
}

/// Public projection of a user; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: i64,
    pub email: String,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenOut {
    pub access_token: String,
    pub token_type: String,
}

pub async fn register(
    req: web::Json<UserIn>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    info!("Received registration request for email: {}", req.email);
    match state.auth.register(&req.email, &req.password).await {
        Ok(_) => Ok(HttpResponse::Created().json(serde_json::json!({
            "details": "User created"
        }))),
        Err(e) => {
            error!("Registration failed for email: {}: {}", req.email, e);
            Err(e)
        }
    }
}

pub async fn login(
    req: web::Json<UserIn>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    info!("Received login request for email: {}", req.email);
    let access_token = state.auth.login(&req.email, &req.password).await?;
    Ok(HttpResponse::Ok().json(TokenOut {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse> {
    let users = state.auth.list_users().await?;
    let users: Vec<UserOut> = users.into_iter().map(UserOut::from).collect();
    Ok(HttpResponse::Ok().json(users))
}
