use actix_web::{get, web, HttpResponse};
use crate::appdata::AppData;
use crate::error::ApiError;
use prometheus::{TextEncoder, Encoder};

#[get("/metrics")]
pub async fn get_metrics(data: web::Data<AppData>) -> Result<HttpResponse, ApiError> {
    let families = data.prom.registry.gather();
    let mut buff = Vec::new();

    let encoder = TextEncoder::new();
    encoder.encode(&families, &mut buff)?;

    let body = String::from_utf8(buff).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok().content_type(encoder.format_type()).body(body))
}
