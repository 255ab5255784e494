/// Payment Provider Webhooks
///
/// Polka calls this endpoint when a user pays for Chirpy Red. Calls are
/// authenticated with a static API key in `Authorization: ApiKey <key>`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{get_api_key, verify_api_key};
use crate::configuration::PolkaSettings;
use crate::error::{AppError, ErrorContext, ValidationError};
use crate::store::ChirpyStore;

/// The only event that changes state
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct PolkaWebhook {
    pub event: String,
    #[serde(default)]
    pub data: PolkaWebhookData,
}

#[derive(Deserialize, Default)]
pub struct PolkaWebhookData {
    pub user_id: Option<Uuid>,
}

/// POST /api/polka/webhooks
///
/// The key is checked before the body is parsed. Unknown events are
/// acknowledged with 204 and ignored.
///
/// # Errors
/// - 401: Missing or wrong API key
/// - 400: Malformed body, or `user.upgraded` without a user ID
/// - 404: Unknown user
pub async fn polka_webhook(
    req: HttpRequest,
    body: web::Bytes,
    store: web::Data<dyn ChirpyStore>,
    polka: web::Data<PolkaSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("polka_webhook");

    let api_key = get_api_key(req.headers())?;
    verify_api_key(&api_key, &polka.api_key)?;

    let payload: PolkaWebhook = serde_json::from_slice(&body)
        .map_err(|_| ValidationError::InvalidFormat("request body".to_string()))?;

    if payload.event != USER_UPGRADED_EVENT {
        tracing::debug!(
            request_id = %context.request_id,
            event = %payload.event,
            "Ignoring webhook event"
        );
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = payload
        .data
        .user_id
        .ok_or_else(|| ValidationError::EmptyField("data.user_id".to_string()))?;

    store.set_user_red(user_id, true).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        "User upgraded to Chirpy Red"
    );

    Ok(HttpResponse::NoContent().finish())
}
