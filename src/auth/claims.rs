/// JWT Claims structure
///
/// Payload of an access token: who the token speaks for, who issued it,
/// and the window in which it is valid (RFC 7519 registered claims only).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Issuer stamped into every access token
pub const TOKEN_ISSUER: &str = "chirpy";

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create claims for `user_id` valid for `expires_in` from now
    pub fn new(user_id: Uuid, expires_in: chrono::Duration) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            exp: now + expires_in.num_seconds(),
            iat: now,
            iss: TOKEN_ISSUER.to_string(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// A subject that is not a UUID makes the whole token invalid.
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::TokenInvalid)
    }
}
