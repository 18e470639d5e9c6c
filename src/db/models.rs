use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Full stored job, including the verbatim origin record
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobRow {
    pub id: Uuid,
    pub source: String,
    pub source_job_id: String,
    pub company: String,
    pub title: String,
    pub location: String,
    pub is_remote: bool,
    pub posted_at: Option<DateTime<Utc>>,
    pub apply_url: String,
    pub description: String,
    pub raw_json: sqlx::types::JsonValue,
    pub updated_at: DateTime<Utc>,
}

/// Stored job as loaded for browsing (no `raw_json`)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobListing {
    pub id: Uuid,
    pub source: String,
    pub source_job_id: String,
    pub company: String,
    pub title: String,
    pub location: String,
    pub is_remote: bool,
    pub posted_at: Option<DateTime<Utc>>,
    pub apply_url: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl JobListing {
    /// Posting day in UTC
    pub fn posted_date(&self) -> Option<NaiveDate> {
        self.posted_at.map(|ts| ts.date_naive())
    }
}
