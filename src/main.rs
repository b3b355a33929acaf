use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, get};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use serde_json::json;

use blog_mgt_backend::AppServices;
use blog_mgt_backend::database::JsonStore;
use blog_mgt_backend::middleware::not_found::not_found;
use blog_mgt_backend::state::COLLECTIONS;
use blog_mgt_backend::utils::config::AppConfig;
use blog_mgt_backend::utils::helpers::service_name;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Blog management API",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let store = JsonStore::new(&config.data_dir);
    store.init(&COLLECTIONS).await?;
    info!("Using data directory {}", store.data_dir().display());

    let services = AppServices::new(&store, &config);

    info!(
        "Starting {} on http://{}:{}",
        config.service_name, config.host, config.port
    );

    HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(move |cfg| services.configure(cfg))
            .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, not_found))
            .service(default)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
