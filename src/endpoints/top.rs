use actix_web::{get, web, HttpResponse};
use crate::appdata::AppData;
use crate::error::ApiError;
use crate::format::top_players;

#[get("/top/{statistic}")]
pub async fn top(data: web::Data<AppData>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    data.prom.hit("top");
    super::json(&top_players(&path))
}
