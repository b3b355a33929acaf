use super::controller::{add_comment, delete_comment, get_comments};
use actix_web::web;

/// Registered inside the `/posts` scope.
pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{post_id}/comments", web::get().to(get_comments))
        .route("/{post_id}/comments", web::post().to(add_comment))
        .route(
            "/{post_id}/comments/{comment_id}",
            web::delete().to(delete_comment),
        );
}
