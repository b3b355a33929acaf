use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{ResponseError, Result, dev::ServiceResponse};

use crate::utils::error::CustomError;

/// Replaces actix's empty 404 for unmatched routes with the JSON error envelope.
/// Responses that already carry a handler's JSON body pass through untouched.
pub fn not_found<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    if res.response().error().is_some() {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let response = CustomError::NotFoundError("Route does not exist".into()).error_response();
    let (req, _) = res.into_parts();

    Ok(ErrorHandlerResponse::Response(ServiceResponse::new(
        req,
        response.map_into_right_body(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::middleware::ErrorHandlers;
    use actix_web::{App, HttpResponse, test, web};
    use serde_json::Value;

    async fn missing_post() -> Result<HttpResponse, CustomError> {
        Err(CustomError::NotFoundError("Post not found".into()))
    }

    #[actix_web::test]
    async fn unmatched_route_gets_json_envelope() {
        let app = test::init_service(
            App::new()
                .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, not_found))
                .route("/posts/{id}", web::patch().to(missing_post)),
        )
        .await;

        let req = test::TestRequest::get().uri("/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "NOT_FOUND_ERROR");
        assert_eq!(body["httpStatusCode"], 404);
        assert_eq!(body["message"], "Not Found: Route does not exist");
    }

    #[actix_web::test]
    async fn handler_not_found_keeps_its_message() {
        let app = test::init_service(
            App::new()
                .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, not_found))
                .route("/posts/{id}", web::patch().to(missing_post)),
        )
        .await;

        let req = test::TestRequest::patch().uri("/posts/ghost").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Not Found: Post not found");
    }
}
