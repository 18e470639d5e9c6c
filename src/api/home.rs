use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;

use crate::greenhouse::SOURCE;

#[derive(Serialize)]
struct HomeResponse {
    name: &'static str,
    version: &'static str,
    source: &'static str,
    actions: [&'static str; 4],
}

/// What the service does and where to start
#[get("/")]
async fn home() -> impl Responder {
    HttpResponse::Ok().json(HomeResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        source: SOURCE,
        actions: [
            "POST /ingest",
            "GET /jobs",
            "POST /jobs/browse",
            "GET /jobs/{id}",
        ],
    })
}

pub fn home_config(config: &mut web::ServiceConfig) {
    config.service(home);
}
