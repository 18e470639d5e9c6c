use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::filters::BrowseFilters;

fn default_list_limit() -> i64 {
    200
}

fn default_browse_limit() -> i64 {
    500
}

/// Body of an ingest request
#[derive(Deserialize, Debug, Validate)]
pub struct IngestRequest {
    /// Board slug or any supported board URL
    #[validate(length(
        min = 1,
        max = 2048,
        message = "Board must be between 1 and 2048 characters"
    ))]
    pub board: String,
}

/// Query string of a direct store listing
#[derive(Deserialize, Debug, Validate)]
pub struct ListQuery {
    #[serde(default = "default_list_limit")]
    #[validate(range(min = 1, max = 2000, message = "Limit must be between 1 and 2000"))]
    pub limit: i64,
    pub keyword: Option<String>,
}

/// Body of a browse request: how many rows to load, then how to filter them
#[derive(Deserialize, Debug, Validate)]
#[validate(schema(function = "validate_date_range"))]
pub struct BrowseRequest {
    #[serde(default = "default_browse_limit")]
    #[validate(range(min = 25, max = 2000, message = "Limit must be between 25 and 2000"))]
    pub limit: i64,
    pub posted_from: Option<NaiveDate>,
    pub posted_to: Option<NaiveDate>,
    pub title: Option<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub remote_only: bool,
    pub keyword: Option<String>,
}

impl BrowseRequest {
    pub fn filters(&self) -> BrowseFilters {
        BrowseFilters {
            posted_from: self.posted_from,
            posted_to: self.posted_to,
            title: self.title.clone(),
            companies: self.companies.clone(),
            locations: self.locations.clone(),
            remote_only: self.remote_only,
            keyword: self.keyword.clone(),
        }
    }
}

fn validate_date_range(request: &BrowseRequest) -> Result<(), ValidationError> {
    match (request.posted_from, request.posted_to) {
        (Some(from), Some(to)) if from > to => {
            let mut error = ValidationError::new("date_range");
            error.message = Some("posted_from must not be after posted_to".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn browse_defaults() {
        let request: BrowseRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.limit, 500);
        assert!(request.validate().is_ok());
        assert!(!request.filters().remote_only);
    }

    #[test]
    fn browse_rejects_out_of_range_limit() {
        let request: BrowseRequest = serde_json::from_value(json!({"limit": 5000})).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn browse_rejects_inverted_dates() {
        let request: BrowseRequest = serde_json::from_value(json!({
            "posted_from": "2024-06-01",
            "posted_to": "2024-05-01"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn ingest_requires_board() {
        let request = IngestRequest {
            board: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
