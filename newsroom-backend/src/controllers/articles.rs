use actix_web::{web, HttpResponse};
use newsroom_types::{ArticleUpdate, MetaPatch};

use crate::error::ApiError;
use crate::AppState;

/// Set read/relevant flags. A missing or unparseable body is an empty patch.
async fn mark_article(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: Option<web::Json<MetaPatch>>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let patch = body.map(web::Json::into_inner).unwrap_or_default();
    let meta = data.metadata.set_flags(&id, &patch)?;
    Ok(HttpResponse::Ok().json(ArticleUpdate { id, meta }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/articles/{id}/mark", web::post().to(mark_article));
}
