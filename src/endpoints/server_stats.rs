use actix_web::{get, web, HttpResponse};
use crate::appdata::AppData;
use crate::error::ApiError;
use crate::host::guard;

#[get("/server/stats")]
pub async fn server_stats(data: web::Data<AppData>) -> Result<HttpResponse, ApiError> {
    data.prom.hit("server_stats");
    let snapshot = guard(|| data.server.snapshot())?;
    super::json(&snapshot)
}
