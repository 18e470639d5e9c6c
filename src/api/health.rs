use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::error;

/// Probe response
#[derive(Serialize)]
struct ProbeResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run a trivial query; 200 with `up_status` or 503 with `down_status`
async fn probe_database(
    pool: &Pool<Postgres>,
    up_status: &'static str,
    down_status: &'static str,
) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => HttpResponse::Ok().json(ProbeResponse {
            status: up_status,
            database: "connected",
            error: None,
        }),
        Err(e) => {
            error!("{} probe failed: {:?}", down_status, e);
            HttpResponse::ServiceUnavailable().json(ProbeResponse {
                status: down_status,
                database: "disconnected",
                error: Some(format!("Database error: {}", e)),
            })
        }
    }
}

/// Overall health, including the job store
#[get("/health")]
async fn health_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    probe_database(&pool, "healthy", "unhealthy").await
}

/// Ready to ingest and browse: the store is reachable
#[get("/ready")]
async fn readiness_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    probe_database(&pool, "ready", "not_ready").await
}

/// Process is up; dependencies are not checked
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(ProbeResponse {
        status: "alive",
        database: "not_checked",
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
