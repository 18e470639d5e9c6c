use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::filters::Facets;
use crate::db::models::{JobListing, JobRow};
use crate::greenhouse::JobPreview;

/// Number of normalized records echoed back after an ingest
pub const PREVIEW_LEN: usize = 10;

/// Response for an ingest run
#[derive(Serialize)]
pub struct IngestResponse {
    pub message: String,
    pub board: String,
    pub fetched: usize,
    pub upserted: usize,
    pub preview: Vec<JobPreview>,
}

/// Response for a direct store listing
#[derive(Serialize)]
pub struct ListResponse {
    pub count: usize,
    pub jobs: Vec<JobListing>,
}

/// One row of the browse table
#[derive(Serialize)]
pub struct BrowseRow {
    pub id: Uuid,
    pub company: String,
    pub title: String,
    pub location: String,
    pub is_remote: bool,
    pub posted_date: Option<NaiveDate>,
    pub apply_url: String,
}

impl From<JobListing> for BrowseRow {
    fn from(job: JobListing) -> Self {
        Self {
            posted_date: job.posted_date(),
            id: job.id,
            company: job.company,
            title: job.title,
            location: job.location,
            is_remote: job.is_remote,
            apply_url: job.apply_url,
        }
    }
}

/// Response for a browse request
#[derive(Serialize)]
pub struct BrowseResponse {
    /// Rows loaded from the store before filtering
    pub loaded: usize,
    /// Rows left after filtering
    pub count: usize,
    pub facets: Facets,
    pub jobs: Vec<BrowseRow>,
}

/// Response for the detail view
#[derive(Serialize)]
pub struct JobDetailResponse {
    pub posted_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub job: JobRow,
}
