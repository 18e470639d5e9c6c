use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sqlx::{Pool, Postgres};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::dto::{
    BrowseResponse, BrowseRow, IngestResponse, JobDetailResponse, ListResponse, PREVIEW_LEN,
};
use super::filters::Facets;
use super::models::BrowseRequest;
use crate::api::validation::ErrorResponse;
use crate::db::{job_repository::JobRepository, PersistenceError};
use crate::greenhouse::{self, FetchError, GreenhouseClient, InvalidSlugError, JobPreview};

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Board input could not be turned into a slug
    #[error(transparent)]
    InvalidSlug(#[from] InvalidSlugError),

    /// Job board request failed or returned an unexpected shape
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Store rejected the operation
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Job not found
    #[error("Job not found: {0}")]
    NotFound(Uuid),
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidSlug(_) => StatusCode::BAD_REQUEST,
            ServiceError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ServiceError::InvalidSlug(e) => {
                warn!("Invalid board input: {}", e);
                "Invalid board"
            }
            ServiceError::Fetch(e) => {
                error!("Fetch error: {}", e);
                "Failed to fetch jobs from Greenhouse"
            }
            ServiceError::Persistence(e) => {
                error!("Persistence error: {}", e);
                "Failed to store jobs"
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                "Not found"
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error.to_string(),
            fields: serde_json::json!({"message": self.to_string()}),
        })
    }
}

/// Job service tying the resolver, the fetcher and the store together
pub struct JobService {
    pool: Pool<Postgres>,
    client: GreenhouseClient,
}

impl JobService {
    pub fn new(pool: Pool<Postgres>, client: GreenhouseClient) -> Self {
        Self { pool, client }
    }

    /// Resolve a board, fetch its jobs and upsert them
    ///
    /// # Returns
    /// - `Ok(IngestResponse)` - counts plus a preview of the first records
    /// - `Err(ServiceError)` - the first step that failed; nothing is stored
    ///   unless the fetch succeeded
    pub async fn ingest(&self, board_or_url: &str) -> Result<IngestResponse, ServiceError> {
        let board = greenhouse::resolve(board_or_url)?;
        info!("Service: Ingesting board {}", board);

        let jobs = self.client.fetch_jobs(&board).await?;
        let upserted = JobRepository::upsert(&self.pool, &jobs).await?;

        info!(
            "Service: Board {} ingested: fetched={}, upserted={}",
            board,
            jobs.len(),
            upserted
        );

        Ok(IngestResponse {
            message: format!(
                "Fetched {} jobs from Greenhouse, upserted {} records",
                jobs.len(),
                upserted
            ),
            board: board.to_string(),
            fetched: jobs.len(),
            upserted,
            preview: jobs.iter().take(PREVIEW_LEN).map(JobPreview::from).collect(),
        })
    }

    pub async fn list(
        &self,
        limit: i64,
        keyword: Option<&str>,
    ) -> Result<ListResponse, ServiceError> {
        let jobs = JobRepository::list(&self.pool, limit, keyword).await?;
        Ok(ListResponse {
            count: jobs.len(),
            jobs,
        })
    }

    /// Load up to `limit` jobs and filter them in memory
    ///
    /// Facets describe the whole loaded set so the filter options do not
    /// shrink as filters are applied.
    pub async fn browse(&self, request: &BrowseRequest) -> Result<BrowseResponse, ServiceError> {
        let loaded = JobRepository::list(&self.pool, request.limit, None).await?;
        let facets = Facets::from_jobs(&loaded);
        let total = loaded.len();

        let jobs: Vec<BrowseRow> = request
            .filters()
            .apply(loaded)
            .into_iter()
            .map(BrowseRow::from)
            .collect();

        info!("Service: Browse kept {} of {} loaded jobs", jobs.len(), total);

        Ok(BrowseResponse {
            loaded: total,
            count: jobs.len(),
            facets,
            jobs,
        })
    }

    pub async fn get_job(&self, id: Uuid) -> Result<JobDetailResponse, ServiceError> {
        let job = JobRepository::get_by_id(&self.pool, id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        Ok(JobDetailResponse {
            posted_date: job.posted_at.map(|ts| ts.date_naive()),
            job,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_status_codes() {
        let invalid: ServiceError = greenhouse::resolve("not a url or slug!!").unwrap_err().into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.error_response().status(), StatusCode::BAD_REQUEST);

        let fetch: ServiceError = FetchError::MalformedBody("missing `jobs` array".into()).into();
        assert_eq!(fetch.error_response().status(), StatusCode::BAD_GATEWAY);

        let stored: ServiceError = PersistenceError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(stored.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let missing = ServiceError::NotFound(Uuid::nil());
        assert_eq!(missing.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn messages_come_from_component_errors() {
        let err: ServiceError = greenhouse::resolve("??").unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "could not extract a Greenhouse board slug from \"??\""
        );
    }
}
