use actix_web::{get, web, HttpResponse};
use serde::Serialize;
use crate::appdata::{AppData, API_NAME};

#[derive(Serialize)]
struct Health<'a> {
    status:     &'static str,
    server:     &'static str,
    version:    &'a str
}

#[get("/health")]
pub async fn health(data: web::Data<AppData>) -> HttpResponse {
    data.prom.hit("health");
    HttpResponse::Ok().json(Health {
        status: "ok",
        server: API_NAME,
        version: &data.version
    })
}
