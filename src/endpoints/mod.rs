use crate::error::ApiError;
use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use serde::Serialize;

pub mod fallback;
pub mod health;
pub mod metrics;
pub mod player;
pub mod server_stats;
pub mod top;

fn json<T: Serialize>(value: &T) -> Result<HttpResponse, ApiError> {
    let body = serde_json::to_string(value)?;
    Ok(HttpResponse::Ok().content_type(ContentType::json()).body(body))
}
