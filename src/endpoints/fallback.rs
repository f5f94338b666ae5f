use actix_web::HttpResponse;
use crate::error::ApiError;

/// Answers `OPTIONS` on every path, whether or not a route exists there.
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::EndpointNotFound)
}
