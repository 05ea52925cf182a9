//! Owner-only listing of a link's submissions.
//!
//! Query parameters are forgiving: anything unparseable falls back to the
//! default instead of failing the request.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::application_forms::service::owned_form;
use crate::errors::AppError;
use crate::models::submission::{SortBy, SubmissionQuery, SubmissionRow};
use crate::state::AppState;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Raw `?sort_by=&limit=&date=`. Kept as strings so bad values fall back
/// rather than being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub sort_by: Option<String>,
    pub limit: Option<String>,
    pub date: Option<String>,
}

impl ListingParams {
    pub fn resolve(&self, today: NaiveDate) -> SubmissionQuery {
        SubmissionQuery {
            sort_by: parse_sort_by(self.sort_by.as_deref()),
            limit: parse_limit(self.limit.as_deref()),
            created_on: parse_date(self.date.as_deref(), today),
        }
    }
}

/// Only `created_at` changes the order; everything else ranks by score.
fn parse_sort_by(raw: Option<&str>) -> SortBy {
    match raw.map(|s| s.trim().to_ascii_lowercase()) {
        Some(s) if s == "created_at" => SortBy::CreatedAt,
        _ => SortBy::AtsScore,
    }
}

/// Non-positive or non-numeric falls back to the default; large values are capped.
fn parse_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map_or(DEFAULT_LIMIT, |n| n.min(MAX_LIMIT))
}

/// `all`, `today` (UTC) or `YYYY-MM-DD`. Anything else means no filter.
fn parse_date(raw: Option<&str>, today: NaiveDate) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.eq_ignore_ascii_case("today") {
        return Some(today);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub async fn list_submissions(
    state: &AppState,
    owner: i64,
    form_uuid: Uuid,
    params: &ListingParams,
) -> Result<Vec<SubmissionRow>, AppError> {
    owned_form(state, owner, form_uuid).await?;
    let query = params.resolve(Utc::now().date_naive());
    Ok(state.submissions.list_submissions(form_uuid, &query).await?)
}
