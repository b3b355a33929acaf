use super::post_controller::{
    create_post, delete_post, export_posts, get_posts, search_posts, update_post,
};
use crate::comment::index::comment_routes;
use actix_web::web;

pub fn post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .route("", web::get().to(get_posts))
            .route("", web::post().to(create_post))
            .route("/", web::get().to(get_posts))
            .route("/", web::post().to(create_post))
            .route("/search", web::get().to(search_posts))
            .route("/export", web::get().to(export_posts))
            .route("/{id}", web::patch().to(update_post))
            .route("/{id}", web::delete().to(delete_post))
            .configure(comment_routes),
    );
}
