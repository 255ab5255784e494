/// Admin Routes
///
/// Hit counter readout and a development-only reset.

use actix_web::{http::header::ContentType, web, HttpResponse};

use crate::configuration::ApplicationSettings;
use crate::error::AppError;
use crate::metrics::Metrics;
use crate::store::ChirpyStore;

/// GET /admin/metrics
pub async fn read_metrics(metrics: web::Data<Metrics>) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>",
        metrics.hits()
    ))
}

/// POST /admin/reset
///
/// Deletes every user (and with them all chirps and refresh tokens) and
/// zeroes the hit counter.
///
/// # Errors
/// - 403: Platform is not `dev`
pub async fn reset(
    metrics: web::Data<Metrics>,
    store: web::Data<dyn ChirpyStore>,
    application: web::Data<ApplicationSettings>,
) -> Result<HttpResponse, AppError> {
    if !application.allows_destructive_admin() {
        return Err(AppError::Forbidden(
            "Reset is only allowed in dev environment".to_string(),
        ));
    }

    store.delete_all_users().await?;
    metrics.reset();

    tracing::warn!("All users deleted and metrics reset");

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(format!("Hits reset to: {}", metrics.hits())))
}
