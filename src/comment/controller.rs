use crate::comment::model::CommentPayload;
use crate::comment::service::CommentService;
use crate::utils::error::CustomError;
use crate::utils::helpers::service_name;
use actix_web::{HttpResponse, web};
use serde_json::{Value, json};

/// Get all comments for a post
/// GET /posts/{post_id}/comments
pub async fn get_comments(
    comment_service: web::Data<CommentService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let comments = comment_service.get_comments_for_post(&path).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Add a comment to a post
/// POST /posts/{post_id}/comments
pub async fn add_comment(
    comment_service: web::Data<CommentService>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, CustomError> {
    let payload = CommentPayload::from_json(body.into_inner())?;
    let comment = comment_service.add_comment(&path, payload).await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Delete a comment
/// DELETE /posts/{post_id}/comments/{comment_id}
pub async fn delete_comment(
    comment_service: web::Data<CommentService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CustomError> {
    let (post_id, comment_id) = path.into_inner();
    comment_service.delete_comment(&post_id, &comment_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment deleted successfully",
        "httpStatusCode": 200,
        "service": service_name(),
    })))
}
