use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use serde_json::{Value, json};

use crate::export::{ARCHIVE_NAME, ExportPipeline};
use crate::post::post_model::{ListQuery, PostPayload, SearchQuery};
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use crate::utils::helpers::service_name;

/// GET /posts?page=&filter=
pub async fn get_posts(
    post_service: web::Data<PostService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, CustomError> {
    let posts = post_service
        .list_posts(query.page.as_deref(), query.filter.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// POST /posts
pub async fn create_post(
    post_service: web::Data<PostService>,
    body: web::Json<Value>,
) -> Result<HttpResponse, CustomError> {
    let payload = PostPayload::from_json(body.into_inner())?;
    let post = post_service.create_post(payload).await?;
    Ok(HttpResponse::Created().json(post))
}

/// PATCH /posts/{id}
pub async fn update_post(
    post_service: web::Data<PostService>,
    post_id: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, CustomError> {
    let payload = PostPayload::from_json(body.into_inner())?;
    let post = post_service.update_post(&post_id, payload).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    post_service: web::Data<PostService>,
    post_id: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    post_service.delete_post(&post_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post deleted successfully",
        "httpStatusCode": 200,
        "service": service_name(),
    })))
}

/// GET /posts/search?q=
pub async fn search_posts(
    post_service: web::Data<PostService>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, CustomError> {
    let posts = post_service.search_posts(query.q.as_deref()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/export
pub async fn export_posts(
    post_service: web::Data<PostService>,
    exporter: web::Data<ExportPipeline>,
) -> Result<HttpResponse, CustomError> {
    let posts = post_service.all_posts().await?;
    let archive = exporter.run(&posts).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/zip")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(ARCHIVE_NAME.to_string())],
        })
        .streaming(archive.into_stream()))
}
