use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{error, middleware::Logger, web, App, HttpRequest, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::Settings;
use crate::error::{AppError, ValidationError};
use crate::logger::LoggerMiddleware;
use crate::metrics::Metrics;
use crate::middleware::MetricsMiddleware;
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, get_chirps, health_check, login,
    polka_webhook, read_metrics, refresh, reset, revoke, update_user, validate_chirp,
};
use crate::store::ChirpyStore;

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %err, "Rejected JSON payload");
    AppError::Validation(ValidationError::InvalidFormat("request body".to_string())).into()
}

fn path_error_handler(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %err, "Rejected path parameter");
    AppError::Validation(ValidationError::InvalidFormat("path parameter".to_string())).into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %err, "Rejected query string");
    AppError::Validation(ValidationError::InvalidFormat("query string".to_string())).into()
}

pub fn run(
    listener: TcpListener,
    store: Arc<dyn ChirpyStore>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let store: web::Data<dyn ChirpyStore> = web::Data::from(store);
    let metrics = web::Data::new(Metrics::new());
    let jwt_config = web::Data::new(settings.jwt);
    let polka_config = web::Data::new(settings.polka);
    let static_dir = settings.application.static_dir.clone();
    let application = web::Data::new(settings.application);

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(store.clone())
            .app_data(metrics.clone())
            .app_data(jwt_config.clone())
            .app_data(polka_config.clone())
            .app_data(application.clone())

            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .route("/validate_chirp", web::post().to(validate_chirp))
                    .service(
                        web::resource("/users")
                            .route(web::post().to(create_user))
                            .route(web::put().to(update_user)),
                    )
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .service(
                        web::resource("/chirps")
                            .route(web::post().to(create_chirp))
                            .route(web::get().to(get_chirps)),
                    )
                    .service(
                        web::resource("/chirps/{chirp_id}")
                            .route(web::get().to(get_chirp))
                            .route(web::delete().to(delete_chirp)),
                    )
                    .route("/polka/webhooks", web::post().to(polka_webhook)),
            )
            .service(
                web::scope("/admin")
                    .route("/metrics", web::get().to(read_metrics))
                    .route("/reset", web::post().to(reset)),
            )

            // Static files; every request here counts as a hit
            .service(
                web::scope("/app")
                    .wrap(MetricsMiddleware::new(metrics.clone()))
                    .service(fs::Files::new("/", &static_dir).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
