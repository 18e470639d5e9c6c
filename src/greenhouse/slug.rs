use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use url::Url;

/// Host serving the JSON job-board API. Pasted API URLs carry the board
/// after a `boards` segment instead of as the first path segment.
const API_HOST: &str = "boards-api.greenhouse.io";

static BARE_SLUG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9][a-z0-9\-_]{1,80}$").expect("bare slug pattern is valid")
});

/// Raised when no board slug can be derived from user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not extract a Greenhouse board slug from {input:?}")]
pub struct InvalidSlugError {
    pub input: String,
}

/// Canonical, lower-cased board identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardSlug(String);

impl BoardSlug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BoardSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve a board slug from a bare slug or one of the board URL shapes
///
/// Accepted shapes:
/// - `stripe`
/// - `https://boards.greenhouse.io/stripe`
/// - `https://boards.greenhouse.io/embed/job_board?for=stripe`
/// - `https://boards-api.greenhouse.io/v1/boards/stripe/jobs`
pub fn resolve(input: &str) -> Result<BoardSlug, InvalidSlugError> {
    let trimmed = input.trim();

    if BARE_SLUG.is_match(trimmed) {
        return Ok(BoardSlug(trimmed.to_lowercase()));
    }

    parse_url(trimmed)
        .and_then(|url| slug_from_url(&url))
        .map(BoardSlug)
        .ok_or_else(|| InvalidSlugError {
            input: input.to_string(),
        })
}

/// Parse input as an absolute URL, retrying scheme-less `host/path` input as https
fn parse_url(input: &str) -> Option<Url> {
    match Url::parse(input) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase)
            if input.contains('/') && !input.contains(char::is_whitespace) =>
        {
            Url::parse(&format!("https://{}", input)).ok()
        }
        Err(_) => None,
    }
}

fn slug_from_url(url: &Url) -> Option<String> {
    // embed style: ?for=<board>
    if let Some(board) = url
        .query_pairs()
        .filter(|(key, _)| key == "for")
        .map(|(_, value)| value.trim().to_lowercase())
        .find(|value| !value.is_empty())
    {
        return Some(board);
    }

    // path segments stay percent-encoded in a parsed Url
    let parts: Vec<String> = url
        .path_segments()
        .map(|segments| {
            segments
                .filter(|s| !s.is_empty())
                .map(|s| {
                    urlencoding::decode(s)
                        .map(|decoded| decoded.into_owned())
                        .unwrap_or_else(|_| s.to_string())
                })
                .collect()
        })
        .unwrap_or_default();

    // API style: /v1/boards/<board>/jobs
    if url.host_str() == Some(API_HOST) {
        if let Some(i) = parts.iter().position(|p| *p == "boards") {
            if let Some(board) = parts.get(i + 1) {
                return Some(board.trim().to_lowercase());
            }
        }
    }

    // board page style: /<board>
    parts
        .first()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(input: &str) -> String {
        resolve(input).unwrap().to_string()
    }

    #[test]
    fn bare_slug_is_lowercased() {
        assert_eq!(slug("Stripe"), "stripe");
        assert_eq!(slug("  acme-corp_2 "), "acme-corp_2");
    }

    #[test]
    fn embed_url_uses_for_parameter() {
        assert_eq!(
            slug("https://boards.greenhouse.io/embed/job_board?for=Acme"),
            "acme"
        );
    }

    #[test]
    fn empty_for_parameter_falls_through_to_path() {
        assert_eq!(
            slug("https://boards.greenhouse.io/embed/job_board?for="),
            "embed"
        );
    }

    #[test]
    fn api_url_uses_segment_after_boards() {
        assert_eq!(
            slug("https://boards-api.greenhouse.io/v1/boards/acme/jobs"),
            "acme"
        );
    }

    #[test]
    fn api_url_without_board_takes_first_segment() {
        assert_eq!(slug("https://boards-api.greenhouse.io/v1/boards"), "v1");
    }

    #[test]
    fn board_page_url_uses_first_segment() {
        assert_eq!(slug("https://boards.greenhouse.io/acme"), "acme");
        assert_eq!(slug("https://boards.greenhouse.io/Acme/jobs/123"), "acme");
    }

    #[test]
    fn percent_encoded_segments_are_decoded() {
        assert_eq!(slug("https://boards.greenhouse.io/acme%2Dcorp"), "acme-corp");
        assert_eq!(slug("https://boards.greenhouse.io/Acme%5Fco/jobs"), "acme_co");
        assert_eq!(
            slug("https://boards-api.greenhouse.io/v1/boards/acme%2dcorp/jobs"),
            "acme-corp"
        );
    }

    #[test]
    fn scheme_less_url_is_accepted() {
        assert_eq!(slug("boards.greenhouse.io/acme"), "acme");
    }

    #[test]
    fn garbage_is_rejected() {
        let err = resolve("not a url or slug!!").unwrap_err();
        assert_eq!(err.input, "not a url or slug!!");
    }

    #[test]
    fn url_without_path_is_rejected() {
        assert!(resolve("https://boards.greenhouse.io/").is_err());
        assert!(resolve("").is_err());
        assert!(resolve("a").is_err());
    }
}
