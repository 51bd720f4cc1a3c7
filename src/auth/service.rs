use tracing::info;

use crate::auth::credentials;
use crate::auth::token::TokenService;
use crate::db::models::User;
use crate::db::operations::DbOperations;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::Result;

/// Registration, login and bearer-token resolution.
pub struct AuthService {
    db: DbOperations,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(db: DbOperations, tokens: TokenService) -> Self {
        Self { db, tokens }
    }

    /// Register a new account. Fails with `Conflict` when the email is
    /// already taken; the UNIQUE constraint on `users.email` closes the
    /// window between the lookup and the insert.
    pub async fn register(&self, email: &str, password: &str) -> Result<User> {
        if self.db.get_user_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = Self::hash_on_blocking_thread(password).await?;

        match self.db.create_user(email, &password_hash).await {
            Ok(user) => {
                info!("Registered user {}", user.email);
                Ok(user)
            }
            Err(AppError::DatabaseError(DatabaseError::Duplicate)) => Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    /// Verify credentials and issue a token keyed on the user's email.
    ///
    /// Unknown email and wrong password take the same exit so the response
    /// cannot be used for email enumeration.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let user = self
            .db
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = password.to_string();
        let stored_hash = user.password.clone();
        let verified = tokio::task::spawn_blocking(move || {
            credentials::verify_password(&password, &stored_hash)
        })
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        if !verified {
            return Err(AuthError::InvalidCredentials.into());
        }

        info!("Issuing token for {}", user.email);
        self.tokens.issue(&user.email)
    }

    /// Resolve a bearer token into its user. Any failure, including a token
    /// whose subject no longer exists, reports the same `InvalidToken`.
    pub async fn resolve_token(&self, token: &str) -> Result<User> {
        let subject = self.tokens.verify(token)?;

        self.db
            .get_user_by_email(&subject)
            .await?
            .ok_or_else(|| AuthError::InvalidToken.into())
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.db.list_users().await
    }

    /// Argon2 is CPU-bound; run it off the async workers so concurrent
    /// requests keep being served while a hash is computed.
    async fn hash_on_blocking_thread(password: &str) -> Result<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || credentials::hash_password(&password))
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?
    }
}
