use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Origin platform tag stored with every record
pub const SOURCE: &str = "greenhouse";

/// Location substrings that mark a posting as remote
const REMOTE_MARKERS: [&str; 3] = ["remote", "work from home", "wfh"];

/// Normalized job posting ready to be persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub source: String,
    pub source_job_id: String,
    pub company: String,
    pub title: String,
    pub location: String,
    pub is_remote: bool,
    pub posted_at: Option<DateTime<Utc>>,
    pub apply_url: String,
    /// HTML
    pub description: String,
    pub raw_json: Value,
}

/// Columns shown in the post-ingest preview
#[derive(Debug, Clone, Serialize)]
pub struct JobPreview {
    pub company: String,
    pub title: String,
    pub location: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub apply_url: String,
}

impl From<&JobRecord> for JobPreview {
    fn from(job: &JobRecord) -> Self {
        Self {
            company: job.company.clone(),
            title: job.title.clone(),
            location: job.location.clone(),
            posted_at: job.posted_at,
            apply_url: job.apply_url.clone(),
        }
    }
}

impl JobRecord {
    /// Map one element of the board's `jobs` array
    ///
    /// Returns `None` when the element has no usable id, since the id is half
    /// of the upsert key.
    pub fn from_greenhouse(board: &str, raw: Value) -> Option<Self> {
        let source_job_id = job_id(&raw)?;

        let location = match raw.get("location") {
            Some(Value::Object(loc)) => str_field(loc.get("name")),
            other => str_field(other),
        };

        let company = match str_field(raw.get("company_name")) {
            name if name.is_empty() => board.to_string(),
            name => name,
        };

        let posted_at = ["updated_at", "created_at"]
            .iter()
            .find_map(|key| parse_timestamp(&source_job_id, key, raw.get(*key)));

        Some(Self {
            source: SOURCE.to_string(),
            is_remote: is_remote(&location),
            title: str_field(raw.get("title")),
            apply_url: str_field(raw.get("absolute_url")),
            description: str_field(raw.get("content")),
            source_job_id,
            company,
            location,
            posted_at,
            raw_json: raw,
        })
    }
}

/// Rough remote heuristic over the location text
pub fn is_remote(location: &str) -> bool {
    let location = location.to_lowercase();
    REMOTE_MARKERS.iter().any(|marker| location.contains(marker))
}

fn job_id(raw: &Value) -> Option<String> {
    let id = match raw.get("id")? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    if id.is_empty() || id == "None" {
        None
    } else {
        Some(id)
    }
}

fn str_field(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn parse_timestamp(job_id: &str, key: &str, value: Option<&Value>) -> Option<DateTime<Utc>> {
    let text = value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())?;

    match DateTime::parse_from_rfc3339(text.trim()) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            warn!("Job {}: ignoring unparseable {}={:?}: {}", job_id, key, text, e);
            None
        }
    }
}
