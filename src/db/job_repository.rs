use sqlx::{types::Json, Pool, Postgres, QueryBuilder};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::models::{JobListing, JobRow};
use super::PersistenceError;
use crate::greenhouse::JobRecord;

/// Rows per INSERT statement; keeps bind parameters well under the
/// Postgres limit of 65535 (11 per row).
const UPSERT_CHUNK_SIZE: usize = 1000;

const LISTING_COLUMNS: &str = "id, source, source_job_id, company, title, location, is_remote, \
     posted_at, apply_url, description, updated_at";

const ROW_COLUMNS: &str = "id, source, source_job_id, company, title, location, is_remote, \
     posted_at, apply_url, description, raw_json, updated_at";

/// Repository for Job database operations
pub struct JobRepository;

impl JobRepository {
    /// Insert or update jobs keyed by (source, source_job_id)
    ///
    /// The whole batch runs in one transaction. On conflict every mutable
    /// column is overwritten and `updated_at` is reset; `id` is kept.
    /// Returns the number of records attempted.
    pub async fn upsert(
        pool: &Pool<Postgres>,
        jobs: &[JobRecord],
    ) -> Result<usize, PersistenceError> {
        if jobs.is_empty() {
            debug!("Upsert called with empty job list");
            return Ok(0);
        }

        let batch = last_per_key(jobs);
        debug!(
            "Starting upsert of {} jobs ({} distinct keys)",
            jobs.len(),
            batch.len()
        );

        let mut tx = pool.begin().await?;

        for chunk in batch.chunks(UPSERT_CHUNK_SIZE) {
            let mut query = QueryBuilder::<Postgres>::new(
                "INSERT INTO jobs (source, source_job_id, company, title, location, is_remote, \
                 posted_at, apply_url, description, raw_json, updated_at) ",
            );

            query.push_values(chunk.iter().copied(), |mut row, job| {
                row.push_bind(&job.source)
                    .push_bind(&job.source_job_id)
                    .push_bind(&job.company)
                    .push_bind(&job.title)
                    .push_bind(&job.location)
                    .push_bind(job.is_remote)
                    .push_bind(job.posted_at)
                    .push_bind(&job.apply_url)
                    .push_bind(&job.description)
                    .push_bind(Json(&job.raw_json))
                    .push("now()");
            });

            query.push(
                " ON CONFLICT (source, source_job_id) DO UPDATE SET \
                 company = EXCLUDED.company, \
                 title = EXCLUDED.title, \
                 location = EXCLUDED.location, \
                 is_remote = EXCLUDED.is_remote, \
                 posted_at = EXCLUDED.posted_at, \
                 apply_url = EXCLUDED.apply_url, \
                 description = EXCLUDED.description, \
                 raw_json = EXCLUDED.raw_json, \
                 updated_at = now()",
            );

            let result = query.build().execute(&mut *tx).await?;
            debug!("Upsert chunk affected {} rows", result.rows_affected());
        }

        tx.commit().await?;
        debug!("Upsert committed: {} jobs attempted", jobs.len());

        Ok(jobs.len())
    }

    /// Load up to `limit` jobs, newest posting first, undated last
    ///
    /// A non-empty `keyword` keeps rows whose title, company or description
    /// contains it, ignoring case.
    pub async fn list(
        pool: &Pool<Postgres>,
        limit: i64,
        keyword: Option<&str>,
    ) -> Result<Vec<JobListing>, PersistenceError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {LISTING_COLUMNS} FROM jobs"));

        if let Some(keyword) = keyword.filter(|k| !k.is_empty()) {
            let pattern = format!("%{}%", escape_like(keyword));
            query
                .push(" WHERE (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR company ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        query
            .push(" ORDER BY posted_at DESC NULLS LAST, updated_at DESC LIMIT ")
            .push_bind(limit.max(0));

        let rows = query
            .build_query_as::<JobListing>()
            .fetch_all(pool)
            .await?;

        debug!("Loaded {} jobs (limit={}, keyword={:?})", rows.len(), limit, keyword);
        Ok(rows)
    }

    /// Fetch one job with every stored column
    pub async fn get_by_id(
        pool: &Pool<Postgres>,
        id: Uuid,
    ) -> Result<Option<JobRow>, PersistenceError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {ROW_COLUMNS} FROM jobs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }
}

/// Collapse duplicate keys so a single statement never touches a row twice;
/// the last occurrence wins and keeps its first position.
fn last_per_key(jobs: &[JobRecord]) -> Vec<&JobRecord> {
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();
    let mut batch: Vec<&JobRecord> = Vec::with_capacity(jobs.len());

    for job in jobs {
        let key = (job.source.as_str(), job.source_job_id.as_str());
        match slots.get(&key) {
            Some(&slot) => batch[slot] = job,
            None => {
                slots.insert(key, batch.len());
                batch.push(job);
            }
        }
    }

    batch
}

/// Escape LIKE wildcards so the keyword matches literally
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
