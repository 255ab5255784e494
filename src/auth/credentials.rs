/// Credential extraction from the `Authorization` header
///
/// Two schemes are accepted: `Bearer <token>` for access and refresh
/// tokens, and `ApiKey <key>` for the payment provider webhook.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use constant_time_eq::constant_time_eq;

use crate::error::AuthError;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Return the trimmed credential following `prefix` (case-sensitive)
fn credential_with_prefix(headers: &HeaderMap, prefix: &str) -> Result<String, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedAuthorizationHeader)?;

    let credential = header
        .strip_prefix(prefix)
        .ok_or(AuthError::MalformedAuthorizationHeader)?
        .trim();

    if credential.is_empty() {
        return Err(AuthError::MalformedAuthorizationHeader);
    }

    Ok(credential.to_string())
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn get_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    credential_with_prefix(headers, BEARER_PREFIX)
}

/// Extract the key from `Authorization: ApiKey <key>`
pub fn get_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    credential_with_prefix(headers, API_KEY_PREFIX)
}

/// Compare a presented API key against the configured one in constant time
pub fn verify_api_key(presented: &str, expected: &str) -> Result<(), AuthError> {
    if constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(AuthError::InvalidApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(get_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_is_trimmed() {
        let headers = headers_with("Bearer   abc.def.ghi  ");
        assert_eq!(get_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            get_bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn test_malformed_bearer_headers() {
        for value in ["bearer abc", "Basic dXNlcjpwYXNz", "BearerToken", "Bearer ", "ApiKey abc"] {
            assert_eq!(
                get_bearer_token(&headers_with(value)),
                Err(AuthError::MalformedAuthorizationHeader),
                "should reject {:?}",
                value
            );
        }
    }

    #[test]
    fn test_api_key() {
        let headers = headers_with("ApiKey f271c81ff7084ee5b99a5091b42d486e");
        assert_eq!(
            get_api_key(&headers).unwrap(),
            "f271c81ff7084ee5b99a5091b42d486e"
        );
    }

    #[test]
    fn test_api_key_requires_prefix() {
        let headers = headers_with("Bearer f271c81ff7084ee5b99a5091b42d486e");
        assert!(get_api_key(&headers).is_err());
    }

    #[test]
    fn test_verify_api_key() {
        assert!(verify_api_key("secret-key", "secret-key").is_ok());
        assert_eq!(
            verify_api_key("secret-kez", "secret-key"),
            Err(AuthError::InvalidApiKey)
        );
        assert!(verify_api_key("", "secret-key").is_err());
    }
}
