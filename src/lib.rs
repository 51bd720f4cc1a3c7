pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod posts;

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub use config::Settings;
pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;

pub use auth::{AuthService, AuthenticatedUser, TokenService};
pub use db::{DbOperations, User};
pub use posts::PostService;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all request handlers.
///
/// Built once at startup from the immutable `Settings`; the pool is the
/// single shared connection to the data store.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db_pool: Arc<SqlitePool>,
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await
            .map_err(|e| {
                AppError::DatabaseError(error::DatabaseError::ConnectionError(e.to_string()))
            })?;

        sqlx::migrate!("./migrations").run(&db_pool).await?;

        let db_pool = Arc::new(db_pool);
        let db = DbOperations::new(db_pool.clone());

        let tokens = TokenService::new(
            config.auth.jwt_secret.clone(),
            config.auth.token_expiry_minutes,
        );

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            auth: Arc::new(AuthService::new(db.clone(), tokens)),
            posts: Arc::new(PostService::new(db)),
        })
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.db_pool.close().await;
        Ok(())
    }
}

/// The full route table, shared by `main` and the integration tests so
/// both serve exactly the same surface.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .route("/health", web::get().to(health_check))
    .route("/", web::get().to(posts::handlers::list_posts))
    .route("/post", web::post().to(posts::handlers::create_post))
    .route(
        "/post/{post_id}/no-comments",
        web::get().to(posts::handlers::get_post),
    )
    .route(
        "/post/{post_id}/comment",
        web::get().to(posts::handlers::list_comments),
    )
    .route(
        "/post/{post_id}",
        web::get().to(posts::handlers::get_post_with_comments),
    )
    .route("/comment", web::post().to(posts::handlers::create_comment))
    .route("/register", web::post().to(auth::handlers::register))
    .route("/users", web::get().to(auth::handlers::list_users))
    .route("/token", web::post().to(auth::handlers::login));
}
