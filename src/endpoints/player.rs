use actix_web::{get, web, HttpResponse};
use crate::appdata::AppData;
use crate::error::ApiError;
use crate::lookup::LookupError;

#[get("/player/{username}")]
pub async fn player(data: web::Data<AppData>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    data.prom.hit("player");
    let username = path.into_inner();

    let record = match data.lookup.lookup(&username) {
        Ok(r) => r,
        Err(LookupError::NotFound(_)) => {
            data.prom.player_not_found.inc();
            return Err(ApiError::PlayerNotFound(username));
        }
        Err(LookupError::Host { .. }) => return Err(ApiError::PlayerNotFound(username)),
    };

    if record.is_partial() {
        data.prom.partial_reads.inc();
    }

    super::json(&data.formatter.format(&record))
}
