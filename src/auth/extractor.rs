/// Authenticated caller extractor
///
/// Validates the access token from the `Authorization` header and hands
/// the token's subject to the handler. The user ID always comes from the
/// token, never from the request body.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::credentials::get_bearer_token;
use crate::auth::jwt::validate_jwt;
use crate::configuration::JwtSettings;
use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl AuthenticatedUser {
    fn from_http_request(req: &HttpRequest) -> Result<Self, AppError> {
        let jwt_config = req
            .app_data::<web::Data<JwtSettings>>()
            .ok_or_else(|| AppError::Internal("JWT settings are not registered".to_string()))?;

        let token = get_bearer_token(req.headers())?;

        let user_id = validate_jwt(&token, &jwt_config.secret)?;
        tracing::debug!(user_id = %user_id, "JWT validated successfully");

        Ok(Self { user_id })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}
