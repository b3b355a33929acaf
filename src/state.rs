use actix_web::web;

use crate::comment::service::{COMMENTS, CommentService};
use crate::database::JsonStore;
use crate::export::ExportPipeline;
use crate::middleware::error_handler::{json_config, query_config};
use crate::post::post_service::{POSTS, PostService};
use crate::router::index::routes;
use crate::utils::config::AppConfig;

/// Collections the store must hold before the server accepts requests.
pub const COLLECTIONS: [&str; 2] = [POSTS, COMMENTS];

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppServices {
    pub posts: web::Data<PostService>,
    pub comments: web::Data<CommentService>,
    pub exporter: web::Data<ExportPipeline>,
}

impl AppServices {
    pub fn new(store: &JsonStore, config: &AppConfig) -> Self {
        AppServices {
            posts: web::Data::new(PostService::new(store)),
            comments: web::Data::new(CommentService::new(store)),
            exporter: web::Data::new(ExportPipeline::new(&config.export_dir)),
        }
    }

    /// Registers app data, extractor configs and every route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.posts.clone())
            .app_data(self.comments.clone())
            .app_data(self.exporter.clone())
            .app_data(json_config())
            .app_data(query_config())
            .configure(routes);
    }
}
