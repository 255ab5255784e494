/// User Routes
///
/// Signup and profile update. Responses never include the password or
/// its hash.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, AuthenticatedUser};
use crate::error::{AppError, ErrorContext};
use crate::store::{ChirpyStore, User};
use crate::validators::is_valid_email;

/// Body of signup, login and profile update
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: Invalid email or password over 72 bytes
/// - 409: Email already registered
/// - 500: Hashing or storage failure
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_signup");

    let email = is_valid_email(&form.email)?;
    let hashed_password = hash_password(&form.password)?;

    let user = store.create_user(&email, &hashed_password).await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = %user.id,
        "User created"
    );

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// PUT /api/users
///
/// Updates the email and password of the user named by the access token.
///
/// # Errors
/// - 401: Missing or invalid access token
/// - 400: Invalid email or password over 72 bytes
/// - 409: Email belongs to another user
pub async fn update_user(
    caller: AuthenticatedUser,
    form: web::Json<CredentialsRequest>,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update").with_user_id(caller.user_id);

    let email = is_valid_email(&form.email)?;
    let hashed_password = hash_password(&form.password)?;

    let user = store
        .update_user(caller.user_id, &email, &hashed_password)
        .await?;

    tracing::info!(
        request_id = %context.request_id,
        operation = %context.operation,
        user_id = %user.id,
        "User updated"
    );

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
