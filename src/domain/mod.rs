pub mod article;
pub mod feed;

pub use article::{Article, ArticleSummary};
pub use feed::FeedSubscription;

use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamps are stored as RFC 3339 UTC strings; an empty cell is unknown.
pub(crate) fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_default()
}

pub(crate) fn parse_timestamp(cell: &str) -> Option<DateTime<Utc>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(cell)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| cell.parse::<DateTime<Utc>>().ok())
}

pub(crate) fn cell(row: &[String], column: usize) -> &str {
    row.get(column - 1).map(String::as_str).unwrap_or("")
}
