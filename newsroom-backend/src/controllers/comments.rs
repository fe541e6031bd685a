use actix_web::{web, HttpResponse};
use newsroom_types::NewComment;
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
struct ListQuery {
    #[serde(rename = "articleId")]
    article_id: Option<String>,
}

/// List comments, optionally only those for `?articleId=`
async fn list_comments(data: web::Data<AppState>, query: web::Query<ListQuery>) -> HttpResponse {
    let article_id = query.article_id.as_deref().filter(|id| !id.is_empty());
    HttpResponse::Ok().json(data.comments.list(article_id))
}

async fn create_comment(
    data: web::Data<AppState>,
    body: web::Json<NewComment>,
) -> Result<HttpResponse, ApiError> {
    let comment = data.comments.append(body.into_inner())?;
    log::info!("Comment {} added to article {}", comment.id, comment.article_id);
    Ok(HttpResponse::Created().json(comment))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/comments")
            .route(web::get().to(list_comments))
            .route(web::post().to(create_comment)),
    );
}
