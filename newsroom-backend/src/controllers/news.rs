use actix_web::{web, HttpRequest, HttpResponse};
use newsroom_types::NewsQuery;

use crate::error::ApiError;
use crate::AppState;

/// Search news. The raw query string keys the response cache, so parameter
/// order matters for cache hits.
async fn get_news(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<NewsQuery>,
) -> Result<HttpResponse, ApiError> {
    let response = data.aggregator.query(req.query_string(), &query).await?;
    Ok(HttpResponse::Ok().json(&*response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/news", web::get().to(get_news));
}
