//! Admission control for public submissions: content validation, ban check,
//! then a sliding-window rate limit counted against persisted rows.

use anyhow::Result;
use axum::http::HeaderMap;
use chrono::Duration;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use crate::error::ApiError;
use crate::store::{bans, confessions};

/// Max confessions per submitter IP inside the window.
pub const RATE_LIMIT_MAX: i64 = 15;

/// Trailing window length in hours.
pub const RATE_LIMIT_WINDOW_HOURS: i64 = 1;

/// Longest accepted confession, counted in characters before trimming.
pub const MAX_CONTENT_CHARS: usize = 2000;

pub const DEFAULT_CATEGORY: &str = "other";

pub const CATEGORIES: [&str; 6] = ["love", "work", "family", "friendship", "personal", "other"];

/// Submitter identifier when no proxy header names one.
pub const UNKNOWN_SENTINEL: &str = "unknown";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("Confession content is required")]
    EmptyContent,

    #[error("Confession is too long (max {MAX_CONTENT_CHARS} characters)")]
    ContentTooLong,

    #[error("Invalid category")]
    InvalidCategory,

    #[error("You are banned from submitting confessions.")]
    Banned,

    #[error("Rate limit exceeded: Only {RATE_LIMIT_MAX} confessions allowed per hour.")]
    RateLimited,
}

impl From<AdmissionError> for ApiError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::EmptyContent
            | AdmissionError::ContentTooLong
            | AdmissionError::InvalidCategory => Self::Validation(err.to_string()),
            AdmissionError::Banned => Self::Authorization(err.to_string()),
            AdmissionError::RateLimited => Self::RateLimited {
                limit: RATE_LIMIT_MAX,
            },
        }
    }
}

/// Validate submitted content, returning it trimmed.
///
/// The length limit applies to the raw submission; trimming only happens on
/// the accepted value.
pub fn validate_content(content: &str) -> Result<&str, AdmissionError> {
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(AdmissionError::ContentTooLong);
    }

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AdmissionError::EmptyContent);
    }

    Ok(trimmed)
}

/// Resolve the category, defaulting when unspecified or blank.
pub fn validate_category(category: Option<&str>) -> Result<&str, AdmissionError> {
    match category.map(str::trim) {
        None | Some("") => Ok(DEFAULT_CATEGORY),
        Some(value) if CATEGORIES.contains(&value) => Ok(value),
        Some(_) => Err(AdmissionError::InvalidCategory),
    }
}

/// Pure window decision, split out from the database count.
#[must_use]
pub const fn over_limit(recent_count: i64) -> bool {
    recent_count >= RATE_LIMIT_MAX
}

/// Submitter identifier from proxy headers: first `x-forwarded-for` hop, then
/// `x-real-ip`, else the `"unknown"` sentinel.
#[must_use]
pub fn submitter_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map_or_else(|| UNKNOWN_SENTINEL.to_string(), str::to_string)
}

/// Run the identity-bound checks for one submission: ban registry first, then
/// the trailing-window count.
///
/// Two submissions racing this check can both pass the count before either
/// insert lands, so the effective limit can overshoot by a small margin under
/// heavy concurrency.
///
/// # Errors
/// `AdmissionError` for a denied submission, `ApiError::Upstream` when the
/// store fails.
pub async fn admit(pool: &PgPool, ip: &str) -> Result<(), ApiError> {
    if bans::is_banned(pool, ip).await? {
        debug!("Rejecting submission from banned ip");
        return Err(AdmissionError::Banned.into());
    }

    let window = Duration::hours(RATE_LIMIT_WINDOW_HOURS);
    let recent = confessions::count_recent(pool, ip, window).await?;
    if over_limit(recent) {
        debug!(recent, "Rejecting submission over the rate limit");
        return Err(AdmissionError::RateLimited.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn content_boundary_at_2000_characters() {
        let exactly = "x".repeat(MAX_CONTENT_CHARS);
        assert_eq!(validate_content(&exactly), Ok(exactly.as_str()));

        let over = "x".repeat(MAX_CONTENT_CHARS + 1);
        assert_eq!(validate_content(&over), Err(AdmissionError::ContentTooLong));
    }

    #[test]
    fn content_limit_counts_characters_not_bytes() {
        let multibyte = "é".repeat(MAX_CONTENT_CHARS);
        assert!(validate_content(&multibyte).is_ok());
    }

    #[test]
    fn whitespace_only_content_rejected() {
        assert_eq!(validate_content(""), Err(AdmissionError::EmptyContent));
        assert_eq!(
            validate_content("   \n\t  "),
            Err(AdmissionError::EmptyContent)
        );
    }

    #[test]
    fn content_is_trimmed() {
        assert_eq!(validate_content("  hello  "), Ok("hello"));
    }

    #[test]
    fn category_defaults_and_validates() {
        assert_eq!(validate_category(None), Ok(DEFAULT_CATEGORY));
        assert_eq!(validate_category(Some("")), Ok(DEFAULT_CATEGORY));
        assert_eq!(validate_category(Some("love")), Ok("love"));
        assert_eq!(
            validate_category(Some("gossip")),
            Err(AdmissionError::InvalidCategory)
        );
    }

    #[test]
    fn window_decision_threshold() {
        assert!(!over_limit(0));
        assert!(!over_limit(RATE_LIMIT_MAX - 1));
        assert!(over_limit(RATE_LIMIT_MAX));
        assert!(over_limit(RATE_LIMIT_MAX + 1));
    }

    #[test]
    fn submitter_ip_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));
        assert_eq!(submitter_ip(&headers), "203.0.113.9");
    }

    #[test]
    fn submitter_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));
        assert_eq!(submitter_ip(&headers), "198.51.100.7");
    }

    #[test]
    fn submitter_ip_unknown_when_headers_absent() {
        assert_eq!(submitter_ip(&HeaderMap::new()), UNKNOWN_SENTINEL);
    }

    #[test]
    fn empty_forwarded_header_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("  "));
        assert_eq!(submitter_ip(&headers), UNKNOWN_SENTINEL);
    }

    #[test]
    fn admission_errors_map_to_taxonomy() {
        use axum::http::StatusCode;

        let api: ApiError = AdmissionError::EmptyContent.into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);

        let api: ApiError = AdmissionError::Banned.into();
        assert_eq!(api.status(), StatusCode::FORBIDDEN);

        let api: ApiError = AdmissionError::RateLimited.into();
        assert_eq!(api.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
