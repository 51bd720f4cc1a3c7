use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::db::models::User;
use crate::error::{AppError, AuthError};
use crate::AppState;

/// The verified identity behind a request's bearer token.
///
/// Protected handlers take this as an argument; extraction fails with 401
/// when the Authorization header is missing, the token does not verify, or
/// its subject matches no account. The three cases are indistinguishable
/// from the response.
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::InternalError("Application state missing".into()))?;

            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .ok_or(AuthError::MissingCredentials)?;

            let user = state.auth.resolve_token(token).await?;
            Ok(AuthenticatedUser(user))
        })
    }
}
