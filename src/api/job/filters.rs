use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::db::models::JobListing;

/// Filters applied in memory to an already loaded set of jobs
///
/// Every filter that is set must match. Text filters ignore case and
/// surrounding whitespace; an empty text filter is ignored.
#[derive(Debug, Clone, Default)]
pub struct BrowseFilters {
    /// Inclusive lower bound on the posting day (UTC)
    pub posted_from: Option<NaiveDate>,
    /// Inclusive upper bound on the posting day (UTC)
    pub posted_to: Option<NaiveDate>,
    pub title: Option<String>,
    pub companies: Vec<String>,
    pub locations: Vec<String>,
    pub remote_only: bool,
    /// Matched against title, company and description
    pub keyword: Option<String>,
}

impl BrowseFilters {
    /// Keep matching jobs, newest posting day first and undated last
    pub fn apply(&self, jobs: Vec<JobListing>) -> Vec<JobListing> {
        let title = normalized(self.title.as_deref());
        let keyword = normalized(self.keyword.as_deref());

        let mut kept: Vec<JobListing> = jobs
            .into_iter()
            .filter(|job| self.matches(job, title.as_deref(), keyword.as_deref()))
            .collect();

        // stable: jobs posted the same day keep their load order
        kept.sort_by_key(|job| match job.posted_date() {
            Some(day) => (false, Reverse(Some(day))),
            None => (true, Reverse(None)),
        });

        kept
    }

    fn matches(&self, job: &JobListing, title: Option<&str>, keyword: Option<&str>) -> bool {
        if self.posted_from.is_some() || self.posted_to.is_some() {
            let Some(day) = job.posted_date() else {
                return false;
            };
            if self.posted_from.is_some_and(|from| day < from)
                || self.posted_to.is_some_and(|to| day > to)
            {
                return false;
            }
        }

        if let Some(title) = title {
            if !contains_ignore_case(&job.title, title) {
                return false;
            }
        }

        if !self.companies.is_empty() && !self.companies.contains(&job.company) {
            return false;
        }

        if !self.locations.is_empty() && !self.locations.contains(&job.location) {
            return false;
        }

        if self.remote_only && !job.is_remote {
            return false;
        }

        match keyword {
            Some(kw) => {
                contains_ignore_case(&job.title, kw)
                    || contains_ignore_case(&job.company, kw)
                    || contains_ignore_case(&job.description, kw)
            }
            None => true,
        }
    }
}

/// Options offered by the browse filters for a loaded set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facets {
    pub companies: Vec<String>,
    pub locations: Vec<String>,
    pub earliest_posted: Option<NaiveDate>,
    pub latest_posted: Option<NaiveDate>,
}

impl Facets {
    pub fn from_jobs(jobs: &[JobListing]) -> Self {
        let distinct = |field: fn(&JobListing) -> &str| -> Vec<String> {
            jobs.iter()
                .map(field)
                .filter(|value| !value.trim().is_empty())
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        let days = || jobs.iter().filter_map(JobListing::posted_date);

        Self {
            companies: distinct(|job| job.company.as_str()),
            locations: distinct(|job| job.location.as_str()),
            earliest_posted: days().min(),
            latest_posted: days().max(),
        }
    }
}

/// Trimmed, lower-cased filter text; `None` when blank
fn normalized(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// `needle` must already be lower-cased
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
