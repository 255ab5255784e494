/// Access Token Issuing and Validation
///
/// Access tokens are stateless HS256 JWTs. Validity is decided entirely by
/// signature, issuer and expiry; nothing is looked up and nothing can be
/// revoked before `exp`.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, TOKEN_ISSUER};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// Sign a new access token for `user_id` that expires after `expires_in`
///
/// # Errors
/// Only fails if the signing step itself fails.
pub fn make_jwt(
    user_id: Uuid,
    secret: &str,
    expires_in: chrono::Duration,
) -> Result<String, AppError> {
    let claims = Claims::new(user_id, expires_in);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify a token and return its claims
///
/// Expiry is checked with zero leeway.
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        }
    })
}

/// Verify a token and return the user it was issued for
///
/// # Errors
/// Bad signature, wrong issuer, expiry, or a subject that is not a UUID.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Uuid, AppError> {
    let claims = decode_claims(token, secret)?;
    Ok(claims.user_id()?)
}

/// Issue an access token with the configured lifetime
pub fn generate_access_token(user_id: Uuid, config: &JwtSettings) -> Result<String, AppError> {
    make_jwt(
        user_id,
        &config.secret,
        chrono::Duration::seconds(config.access_token_expiry),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    #[test]
    fn test_make_and_validate_jwt() {
        let user_id = Uuid::new_v4();

        let token = make_jwt(user_id, SECRET, chrono::Duration::hours(1))
            .expect("Failed to generate token");
        let validated = validate_jwt(&token, SECRET).expect("Failed to validate token");

        assert_eq!(validated, user_id);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = make_jwt(Uuid::new_v4(), SECRET, chrono::Duration::seconds(-1))
            .expect("Failed to generate token");

        assert!(matches!(
            decode_claims(&token, SECRET),
            Err(AuthError::TokenExpired)
        ));
        assert!(validate_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = make_jwt(Uuid::new_v4(), SECRET, chrono::Duration::hours(1))
            .expect("Failed to generate token");

        assert!(matches!(
            decode_claims(&token, "another-secret"),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_invalid_token() {
        assert!(validate_jwt("invalid.token.here", SECRET).is_err());
    }

    #[test]
    fn test_tampered_token() {
        let token = make_jwt(Uuid::new_v4(), SECRET, chrono::Duration::hours(1))
            .expect("Failed to generate token");

        let tampered = format!("{}X", token);
        assert!(validate_jwt(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let mut claims = Claims::new(Uuid::new_v4(), chrono::Duration::hours(1));
        claims.iss = "someone-else".to_string();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            decode_claims(&token, SECRET),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_non_uuid_subject() {
        let mut claims = Claims::new(Uuid::new_v4(), chrono::Duration::hours(1));
        claims.sub = "not-a-user".to_string();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(decode_claims(&token, SECRET).is_ok());
        assert!(matches!(
            validate_jwt(&token, SECRET),
            Err(AppError::Auth(AuthError::TokenInvalid))
        ));
    }

    #[test]
    fn test_generate_access_token_uses_configured_lifetime() {
        let config = JwtSettings {
            secret: SECRET.to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 5_184_000,
        };
        let user_id = Uuid::new_v4();

        let token = generate_access_token(user_id, &config).unwrap();
        let claims = decode_claims(&token, SECRET).unwrap();

        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.user_id().unwrap(), user_id);
    }
}
