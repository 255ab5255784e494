/// Session Routes
///
/// Login issues an access token and a refresh token. Refresh trades a live
/// refresh token for a new access token; revoke retires a refresh token.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::auth::{
    check_password_hash, generate_access_token, get_bearer_token, issue_refresh_token,
    revoke_refresh_token, validate_refresh_token,
};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ErrorContext, ValidationError};
use crate::routes::users::{CredentialsRequest, UserResponse};
use crate::store::ChirpyStore;

/// Login response: the user plus both tokens
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// Refresh response
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Refresh and revoke carry their credential in the header only
fn reject_body(body: &web::Bytes) -> Result<(), AppError> {
    if body.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::UnexpectedBody.into())
    }
}

/// POST /api/login
///
/// # Errors
/// - 401: Unknown email or wrong password (same response for both)
/// - 500: Hashing, signing or storage failure
pub async fn login(
    form: web::Json<CredentialsRequest>,
    store: web::Data<dyn ChirpyStore>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let user = store
        .get_user_by_email(form.email.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !check_password_hash(&form.password, &user.hashed_password)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = generate_access_token(user.id, jwt_config.get_ref())?;
    let refresh_token =
        issue_refresh_token(store.get_ref(), user.id, jwt_config.refresh_token_expiry).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: UserResponse::from(user),
        token,
        refresh_token,
    }))
}

/// POST /api/refresh
///
/// The refresh token itself is neither rotated nor extended.
///
/// # Errors
/// - 415: Request has a body
/// - 401: Missing header, or unknown, revoked or expired refresh token
pub async fn refresh(
    req: HttpRequest,
    body: web::Bytes,
    store: web::Data<dyn ChirpyStore>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    reject_body(&body)?;
    let refresh_token = get_bearer_token(req.headers())?;

    let user_id = validate_refresh_token(store.get_ref(), &refresh_token).await?;
    let token = generate_access_token(user_id, jwt_config.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        "Access token refreshed"
    );

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// Idempotent: revoking a revoked or unknown token still answers 204.
///
/// # Errors
/// - 415: Request has a body
/// - 401: Missing or malformed header
pub async fn revoke(
    req: HttpRequest,
    body: web::Bytes,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_revoke");

    reject_body(&body)?;
    let refresh_token = get_bearer_token(req.headers())?;

    if revoke_refresh_token(store.get_ref(), &refresh_token).await? {
        tracing::info!(request_id = %context.request_id, "Refresh token revoked");
    } else {
        tracing::warn!(
            request_id = %context.request_id,
            "Revoke requested for unknown refresh token"
        );
    }

    Ok(HttpResponse::NoContent().finish())
}
