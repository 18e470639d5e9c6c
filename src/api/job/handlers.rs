use actix_web::{
    HttpResponse, get, post,
    web::{self, Data, Path, ServiceConfig, scope},
};
use actix_web_validator::{Json, Query};
use uuid::Uuid;

use super::models::{BrowseRequest, IngestRequest, ListQuery};
use super::service::{JobService, ServiceError};

/// Resolve the board, fetch its jobs and upsert them
#[post("/ingest")]
async fn ingest(
    service: Data<JobService>,
    request: Json<IngestRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.ingest(&request.board).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Stored jobs, newest first; served at both `/jobs` and `/jobs/`
async fn list_jobs(
    service: Data<JobService>,
    query: Query<ListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let response = service
        .list(query.limit, query.keyword.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/browse")]
async fn browse_jobs(
    service: Data<JobService>,
    request: Json<BrowseRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.browse(&request).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.get_job(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(ingest).service(
        scope("/jobs")
            .service(web::resource(["", "/"]).route(web::get().to(list_jobs)))
            .service(browse_jobs)
            .service(get_job),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::validation;
    use crate::greenhouse::GreenhouseClient;
    use actix_web::{App, HttpServer, http::StatusCode, test};
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;

    /// Service whose store is unreachable and never contacted unless a
    /// handler gets as far as the database
    fn offline_service(api_base: &str) -> Data<JobService> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://nobody@127.0.0.1:1/nothing")
            .unwrap();
        let client = GreenhouseClient::new(api_base, Duration::from_secs(5)).unwrap();
        Data::new(JobService::new(pool, client))
    }

    async fn spawn_empty_board() -> String {
        let server = HttpServer::new(|| {
            App::new().route(
                "/v1/boards/{board}/jobs",
                web::get().to(|| async { HttpResponse::Ok().json(json!({"jobs": []})) }),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    macro_rules! app {
        ($service:expr) => {
            test::init_service(
                App::new()
                    .app_data($service)
                    .app_data(validation::json_config())
                    .app_data(validation::query_config())
                    .configure(job_config),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn ingest_rejects_unresolvable_board() {
        let app = app!(offline_service("http://127.0.0.1:1"));

        let req = test::TestRequest::post()
            .uri("/ingest")
            .set_json(json!({"board": "not a url or slug!!"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid board");
    }

    #[actix_web::test]
    async fn ingest_rejects_empty_body() {
        let app = app!(offline_service("http://127.0.0.1:1"));

        let req = test::TestRequest::post()
            .uri("/ingest")
            .set_json(json!({"board": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn ingest_surfaces_fetch_failure() {
        let app = app!(offline_service("http://127.0.0.1:1"));

        let req = test::TestRequest::post()
            .uri("/ingest")
            .set_json(json!({"board": "https://boards.greenhouse.io/acme"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn ingest_of_empty_board_skips_the_store() {
        let base = spawn_empty_board().await;
        let app = app!(offline_service(&base));

        let req = test::TestRequest::post()
            .uri("/ingest")
            .set_json(json!({"board": "Acme"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["board"], "acme");
        assert_eq!(body["fetched"], 0);
        assert_eq!(body["upserted"], 0);
        assert_eq!(body["preview"], json!([]));
    }

    #[actix_web::test]
    async fn browse_validates_limit() {
        let app = app!(offline_service("http://127.0.0.1:1"));

        let req = test::TestRequest::post()
            .uri("/jobs/browse")
            .set_json(json!({"limit": 10}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Validation failed");
    }

    #[actix_web::test]
    async fn list_validates_limit() {
        let app = app!(offline_service("http://127.0.0.1:1"));

        let req = test::TestRequest::get().uri("/jobs?limit=0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn list_accepts_trailing_slash() {
        let app = app!(offline_service("http://127.0.0.1:1"));

        // validation runs, so the route matched
        let req = test::TestRequest::get().uri("/jobs/?limit=0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // a valid query reaches the unreachable store
        let req = test::TestRequest::get().uri("/jobs/?limit=5").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn detail_requires_uuid() {
        let app = app!(offline_service("http://127.0.0.1:1"));

        let req = test::TestRequest::get().uri("/jobs/42").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unreachable_store_is_a_server_error() {
        let app = app!(offline_service("http://127.0.0.1:1"));

        let req = test::TestRequest::get()
            .uri(&format!("/jobs/{}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
