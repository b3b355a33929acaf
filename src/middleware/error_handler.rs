use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest, web};

use crate::utils::error::CustomError;
use crate::utils::validation::body_violation;

/// Malformed JSON bodies become validation errors with a single `body` violation.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid request body: {}", e),
        other => format!("Invalid request body: {}", other),
    };

    body_violation(message).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    CustomError::InvalidQueryError(err.to_string()).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}
