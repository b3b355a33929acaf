use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::utils::helpers::service_name;
use crate::utils::validation::FieldViolation;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Bad Request: {0}")]
    BadRequestError(String),

    #[error("Validation Error: {}", join_violations(.0))]
    ValidationError(Vec<FieldViolation>),

    #[error("Invalid Query: {0}")]
    InvalidQueryError(String),

    #[error("Not Found: {0}")]
    NotFoundError(String),

    #[error("No Content: {0}")]
    NoContentError(String),

    #[error("Storage Read Error: {0}")]
    StorageReadError(String),

    #[error("Storage Write Error: {0}")]
    StorageWriteError(String),

    #[error("Export Generation Error: {0}")]
    ExportGenerationError(String),

    #[error("Export Stream Error: {0}")]
    ExportStreamError(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl CustomError {
    pub fn error_code(&self) -> &'static str {
        match self {
            CustomError::BadRequestError(..) => "BAD_REQUEST_ERROR",
            CustomError::ValidationError(..) => "VALIDATION_ERROR",
            CustomError::InvalidQueryError(..) => "INVALID_QUERY_ERROR",
            CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
            CustomError::NoContentError(..) => "NO_CONTENT_ERROR",
            CustomError::StorageReadError(..) => "STORAGE_READ_ERROR",
            CustomError::StorageWriteError(..) => "STORAGE_WRITE_ERROR",
            CustomError::ExportGenerationError(..) => "EXPORT_GENERATION_ERROR",
            CustomError::ExportStreamError(..) => "EXPORT_STREAM_ERROR",
            CustomError::InternalServerError(..) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Message sent to the client. Server-side failures are reduced to a fixed
    /// text; the detail only goes to the log.
    fn public_message(&self) -> String {
        match self {
            CustomError::StorageReadError(..) => "Error reading stored data".to_string(),
            CustomError::StorageWriteError(..) => "Error saving data".to_string(),
            CustomError::ExportGenerationError(..) => "Error exporting posts".to_string(),
            CustomError::ExportStreamError(..) => "Error downloading ZIP file".to_string(),
            CustomError::InternalServerError(..) => "Internal Server Error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::BadRequestError(..) => StatusCode::BAD_REQUEST,
            CustomError::ValidationError(..) => StatusCode::BAD_REQUEST,
            CustomError::InvalidQueryError(..) => StatusCode::BAD_REQUEST,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::NoContentError(..) => StatusCode::NOT_FOUND,
            CustomError::StorageReadError(..)
            | CustomError::StorageWriteError(..)
            | CustomError::ExportGenerationError(..)
            | CustomError::ExportStreamError(..)
            | CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }

        let mut body = json!({
            "success": false,
            "message": self.public_message(),
            "httpStatusCode": status.as_u16(),
            "error": self.error_code(),
            "service": service_name(),
        });

        if let CustomError::ValidationError(violations) = self {
            body["errors"] = json!(violations);
        }

        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(
            CustomError::InvalidQueryError("page".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CustomError::NoContentError("empty".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CustomError::ExportStreamError("closed".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn validation_response_lists_every_violation() {
        let err = CustomError::ValidationError(vec![
            FieldViolation::new("content", "content must be at least 5 characters"),
            FieldViolation::new("title", "title must be at least 3 characters"),
        ]);

        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
        assert_eq!(body["errors"][1]["field"], "title");
    }

    #[actix_web::test]
    async fn server_errors_hide_internal_detail() {
        let err = CustomError::StorageReadError("/srv/data/posts.json: EOF".into());
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["message"], "Error reading stored data");
        assert_eq!(body["httpStatusCode"], 500);
    }
}
