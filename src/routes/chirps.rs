/// Chirp Routes
///
/// Anyone may read chirps. Posting needs an access token; deleting needs
/// the access token of the chirp's author.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext};
use crate::store::ChirpyStore;
use crate::validators::{clean_body, validate_chirp_body};

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct CleanedChirpResponse {
    pub cleaned_body: String,
}

#[derive(Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Deserialize)]
pub struct ChirpsQuery {
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// POST /api/validate_chirp
///
/// Dry run of the chirp checks: returns the filtered body without storing it.
pub async fn validate_chirp(form: web::Json<ChirpRequest>) -> Result<HttpResponse, AppError> {
    validate_chirp_body(&form.body)?;

    Ok(HttpResponse::Ok().json(CleanedChirpResponse {
        cleaned_body: clean_body(&form.body),
    }))
}

/// POST /api/chirps
///
/// # Errors
/// - 401: Missing or invalid access token
/// - 400: Body longer than 140 characters
pub async fn create_chirp(
    caller: AuthenticatedUser,
    form: web::Json<ChirpRequest>,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("chirp_creation").with_user_id(caller.user_id);

    validate_chirp_body(&form.body)?;
    let body = clean_body(&form.body);

    let chirp = store.create_chirp(&body, caller.user_id).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = ?context.user_id,
        chirp_id = %chirp.id,
        "Chirp created"
    );

    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps[?author_id=<uuid>][&sort=asc|desc]
///
/// Oldest first unless `sort=desc`.
pub async fn get_chirps(
    query: web::Query<ChirpsQuery>,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let mut chirps = match query.author_id {
        Some(author_id) => store.get_chirps_by_user_id(author_id).await?,
        None => store.get_chirps().await?,
    };

    if query.sort == SortOrder::Desc {
        chirps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<Uuid>,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = path.into_inner();

    let chirp = store
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Chirp not found".to_string()))?;

    Ok(HttpResponse::Ok().json(chirp))
}

/// DELETE /api/chirps/{chirp_id}
///
/// # Errors
/// - 401: Missing or invalid access token
/// - 404: No such chirp
/// - 403: Caller is not the author
pub async fn delete_chirp(
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    store: web::Data<dyn ChirpyStore>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = path.into_inner();
    let context = ErrorContext::new("chirp_deletion").with_user_id(caller.user_id);

    let chirp = store
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Chirp not found".to_string()))?;

    if chirp.user_id != caller.user_id {
        return Err(AuthError::NotOwner.into());
    }

    store.delete_chirp(chirp_id).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = ?context.user_id,
        chirp_id = %chirp_id,
        "Chirp deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
