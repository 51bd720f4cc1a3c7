use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthError};
use crate::Result;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User email
    pub exp: i64,    // Absolute expiry, unix seconds
}

/// Issues and verifies HS256 bearer tokens.
///
/// Tokens are self-contained: validity is decided by signature and expiry
/// alone, with no server-side revocation. The signing secret comes from the
/// immutable process configuration.
pub struct TokenService {
    secret: String,
    expiry: Duration,
}

impl TokenService {
    pub fn new(secret: String, expiry_minutes: i64) -> Self {
        Self {
            secret,
            expiry: Duration::minutes(expiry_minutes),
        }
    }

    /// Issue a token for `subject` with the configured expiry window.
    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_with_expiry(subject, self.expiry)
    }

    pub fn issue_with_expiry(&self, subject: &str, expires_in: Duration) -> Result<String> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (Utc::now() + expires_in).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalError(format!("Token encoding failed: {}", e)))
    }

    /// Verify a token and return its subject. Bad signature, past expiry
    /// and malformed payload all collapse into the same `InvalidToken`.
    pub fn verify(&self, token: &str) -> std::result::Result<String, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is a strict comparison against the current time; no skew
        // allowance.
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims.sub)
        .map_err(|_| AuthError::InvalidToken)
    }
}
