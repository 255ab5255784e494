/// Refresh Token Management
///
/// Refresh tokens are:
/// - 32 bytes from the OS RNG, hex encoded (64 characters)
/// - Stored as-is, keyed by the token value
/// - Long lived and never rotated; renewal only mints access tokens
/// - Revocable: `revoked_at` is set once and never cleared

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use crate::error::{AppError, AuthError, DatabaseError};
use crate::store::{ChirpyStore, RefreshToken};

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new refresh token
///
/// No uniqueness check is made; the store's primary key enforces it.
pub fn make_refresh_token() -> Result<String, AppError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::Internal(format!("Refresh token generation failed: {}", e)))?;
    Ok(hex::encode(bytes))
}

/// Decide whether a stored token may still mint access tokens
///
/// Revocation is checked before expiry.
pub fn check_refresh_token(record: &RefreshToken, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
    if record.revoked_at.is_some() {
        tracing::warn!(user_id = %record.user_id, "Attempt to use revoked refresh token");
        return Err(AuthError::TokenRevoked);
    }

    if record.expires_at < now {
        tracing::info!(user_id = %record.user_id, "Refresh token expired");
        return Err(AuthError::TokenExpired);
    }

    Ok(record.user_id)
}

/// Generate a refresh token for `user_id` and persist it
///
/// # Returns
/// The token value to hand to the client
pub async fn issue_refresh_token(
    store: &dyn ChirpyStore,
    user_id: Uuid,
    expiry_seconds: i64,
) -> Result<String, AppError> {
    let token = make_refresh_token()?;
    let expires_at = Utc::now() + Duration::seconds(expiry_seconds);

    store
        .create_refresh_token(&token, user_id, expires_at)
        .await?;

    Ok(token)
}

/// Look up a refresh token and return the user it belongs to
///
/// # Errors
/// Unknown, revoked and expired tokens are all authentication failures.
pub async fn validate_refresh_token(store: &dyn ChirpyStore, token: &str) -> Result<Uuid, AppError> {
    let record = store.get_refresh_token(token).await?.ok_or_else(|| {
        tracing::warn!("Refresh token not found");
        AuthError::TokenInvalid
    })?;

    Ok(check_refresh_token(&record, Utc::now())?)
}

/// Mark a refresh token revoked
///
/// # Returns
/// `false` when no such token exists. Revoking an already revoked token
/// succeeds and keeps the original revocation time.
pub async fn revoke_refresh_token(store: &dyn ChirpyStore, token: &str) -> Result<bool, AppError> {
    match store.mark_token_revoked(token, Utc::now()).await {
        Ok(()) => Ok(true),
        Err(DatabaseError::NotFound(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn record(expires_at: DateTime<Utc>, revoked_at: Option<DateTime<Utc>>) -> RefreshToken {
        let now = Utc::now();
        RefreshToken {
            token: make_refresh_token().unwrap(),
            user_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at,
        }
    }

    #[test]
    fn test_make_refresh_token() {
        let token = make_refresh_token().unwrap();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_refresh_tokens_differ() {
        let first = make_refresh_token().unwrap();
        let second = make_refresh_token().unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_live_token_is_usable() {
        let now = Utc::now();
        let token = record(now + Duration::days(60), None);

        assert_eq!(check_refresh_token(&token, now), Ok(token.user_id));
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now();
        let token = record(now - Duration::seconds(1), None);

        assert_eq!(check_refresh_token(&token, now), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_revoked_token_checked_before_expiry() {
        let now = Utc::now();
        let live_but_revoked = record(now + Duration::days(1), Some(now));
        let expired_and_revoked = record(now - Duration::days(1), Some(now));

        assert_eq!(
            check_refresh_token(&live_but_revoked, now),
            Err(AuthError::TokenRevoked)
        );
        assert_eq!(
            check_refresh_token(&expired_and_revoked, now),
            Err(AuthError::TokenRevoked)
        );
    }

    #[tokio::test]
    async fn test_issue_validate_revoke() {
        let store = InMemoryStore::new();
        let user = store.create_user("a@b.com", "hash").await.unwrap();

        let token = issue_refresh_token(&store, user.id, 60).await.unwrap();
        assert_eq!(validate_refresh_token(&store, &token).await.unwrap(), user.id);

        assert!(revoke_refresh_token(&store, &token).await.unwrap());
        assert!(matches!(
            validate_refresh_token(&store, &token).await,
            Err(AppError::Auth(AuthError::TokenRevoked))
        ));
    }

    #[tokio::test]
    async fn test_revoke_twice_keeps_first_timestamp() {
        let store = InMemoryStore::new();
        let user = store.create_user("a@b.com", "hash").await.unwrap();
        let token = issue_refresh_token(&store, user.id, 60).await.unwrap();

        assert!(revoke_refresh_token(&store, &token).await.unwrap());
        let first = store.get_refresh_token(&token).await.unwrap().unwrap().revoked_at;

        assert!(revoke_refresh_token(&store, &token).await.unwrap());
        let second = store.get_refresh_token(&token).await.unwrap().unwrap().revoked_at;

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = InMemoryStore::new();

        assert!(matches!(
            validate_refresh_token(&store, "deadbeef").await,
            Err(AppError::Auth(AuthError::TokenInvalid))
        ));
        assert!(!revoke_refresh_token(&store, "deadbeef").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_token_in_store() {
        let store = InMemoryStore::new();
        let user = store.create_user("a@b.com", "hash").await.unwrap();

        let token = issue_refresh_token(&store, user.id, -1).await.unwrap();

        assert!(matches!(
            validate_refresh_token(&store, &token).await,
            Err(AppError::Auth(AuthError::TokenExpired))
        ));
    }
}
