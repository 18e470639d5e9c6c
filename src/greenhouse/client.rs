use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use super::models::JobRecord;
use super::slug::BoardSlug;

pub const DEFAULT_API_BASE: &str = "https://boards-api.greenhouse.io";

/// Errors raised while fetching a board's job list
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Greenhouse returned HTTP {status} for board {board}")]
    Status { board: String, status: StatusCode },

    #[error("request to Greenhouse failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response from Greenhouse: {0}")]
    MalformedBody(String),

    #[error("invalid Greenhouse API base {base}: {reason}")]
    InvalidBaseUrl { base: String, reason: String },
}

/// Client for the public job board API
#[derive(Clone)]
pub struct GreenhouseClient {
    http: Client,
    base_url: Url,
}

impl GreenhouseClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = parse_base_url(base_url)?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// `{base}/v1/boards/{board}/jobs?content=true`
    fn jobs_url(&self, board: &BoardSlug) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1", "boards", board.as_str(), "jobs"]);
        }
        url.query_pairs_mut().append_pair("content", "true");
        url
    }

    /// Fetch every posting on a board in one request
    ///
    /// `content=true` inlines the description HTML so no per-job detail calls
    /// are needed. Entries without an id are skipped.
    pub async fn fetch_jobs(&self, board: &BoardSlug) -> Result<Vec<JobRecord>, FetchError> {
        let url = self.jobs_url(board);
        info!("Fetching jobs for board {} from {}", board, url);

        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!("Greenhouse API error: board={}, status={}", board, status);
            return Err(FetchError::Status {
                board: board.to_string(),
                status,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::MalformedBody(format!("invalid JSON: {e}")))?;

        let jobs = parse_jobs(board, body)?;
        info!("Fetched {} jobs for board {}", jobs.len(), board);
        Ok(jobs)
    }
}

/// Absolute http(s) URL that board paths can be appended to
pub fn parse_base_url(base: &str) -> Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidBaseUrl {
        base: base.to_string(),
        reason,
    };

    let url = Url::parse(base.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    Ok(url)
}

/// Normalize a job list response body
pub fn parse_jobs(board: &BoardSlug, body: Value) -> Result<Vec<JobRecord>, FetchError> {
    let Value::Object(mut body) = body else {
        return Err(FetchError::MalformedBody("expected a JSON object".to_string()));
    };

    let Some(Value::Array(raw_jobs)) = body.remove("jobs") else {
        return Err(FetchError::MalformedBody("missing `jobs` array".to_string()));
    };

    let total = raw_jobs.len();
    let jobs: Vec<JobRecord> = raw_jobs
        .into_iter()
        .filter_map(|raw| JobRecord::from_greenhouse(board.as_str(), raw))
        .collect();

    if jobs.len() < total {
        debug!("Dropped {} jobs without an id on board {}", total - jobs.len(), board);
    }

    Ok(jobs)
}
