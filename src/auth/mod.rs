/// Authentication module
///
/// Password hashing, stateless access tokens (JWT), persisted refresh
/// tokens, and credential extraction from request headers.

mod claims;
mod credentials;
mod extractor;
mod jwt;
mod password;
mod refresh_token;

pub use claims::{Claims, TOKEN_ISSUER};
pub use credentials::{get_api_key, get_bearer_token, verify_api_key};
pub use extractor::AuthenticatedUser;
pub use jwt::{decode_claims, generate_access_token, make_jwt, validate_jwt};
pub use password::{check_password_hash, hash_password};
pub use refresh_token::{
    check_refresh_token, issue_refresh_token, make_refresh_token, revoke_refresh_token,
    validate_refresh_token,
};
