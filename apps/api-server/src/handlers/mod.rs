//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::{HttpResponse, error::InternalError, web};
use blog_shared::ErrorResponse;

/// Largest accepted JSON request body.
const JSON_LIMIT: usize = 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::write))
                    .route("/{id}", web::get().to(posts::read))
                    .route("/{id}", web::patch().to(posts::update))
                    .route("/{id}", web::delete().to(posts::remove)),
            ),
    );
}

/// Malformed JSON bodies become problem responses instead of plain text.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            let response =
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(err.to_string()));
            InternalError::from_response(err, response).into()
        })
}
