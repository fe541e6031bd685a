pub mod articles;
pub mod comments;
pub mod health;
pub mod news;


use actix_web::middleware::from_fn;
use actix_web::{error, web, HttpResponse};

use crate::gateway;
use crate::rate_limit::enforce_rate_limit;

/// Register every route. Expects `web::Data<AppState>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api")
                .wrap(from_fn(enforce_rate_limit))
                .configure(health::config)
                .configure(news::config)
                .configure(comments::config)
                .configure(articles::config),
        )
        .configure(gateway::config);
}

/// Malformed JSON bodies get the same `{"error": ...}` shape as other failures.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    })
}

/// Unparseable query strings, e.g. a repeated key, are reported the same way.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    })
}
