use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{cell, format_timestamp, parse_timestamp};
use crate::store::Row;

/// 1-based column positions in the Articles table.
pub mod columns {
    pub const ID: usize = 1;
    pub const URL: usize = 2;
    pub const TITLE: usize = 3;
    pub const ADDED_DATE: usize = 4;
    pub const LAST_CHECKED: usize = 5;
    pub const CONTENT_HASH: usize = 6;
    pub const IS_READ: usize = 7;
    pub const TAGS: usize = 8;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub url: String,
    pub title: String,
    pub added_date: Option<DateTime<Utc>>,
    pub last_checked: Option<DateTime<Utc>>,
    /// Empty when no digest has been recorded yet.
    pub content_hash: String,
    pub is_read: bool,
    pub tags: String,
}

impl Article {
    /// A fresh unread article with a new id, stamped `now`.
    pub fn new(url: String, title: String, content_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            url,
            title,
            added_date: Some(now),
            last_checked: Some(now),
            content_hash,
            is_read: false,
            tags: String::new(),
        }
    }

    pub fn from_row(row: &[String]) -> Self {
        Self {
            id: cell(row, columns::ID).to_string(),
            url: cell(row, columns::URL).to_string(),
            title: cell(row, columns::TITLE).to_string(),
            added_date: parse_timestamp(cell(row, columns::ADDED_DATE)),
            last_checked: parse_timestamp(cell(row, columns::LAST_CHECKED)),
            content_hash: cell(row, columns::CONTENT_HASH).to_string(),
            is_read: parse_bool(cell(row, columns::IS_READ)),
            tags: cell(row, columns::TAGS).to_string(),
        }
    }

    pub fn to_row(&self) -> Row {
        vec![
            self.id.clone(),
            self.url.clone(),
            self.title.clone(),
            format_timestamp(self.added_date),
            format_timestamp(self.last_checked),
            self.content_hash.clone(),
            format_bool(self.is_read),
            self.tags.clone(),
        ]
    }

    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            id: self.id.clone(),
            url: self.url.clone(),
            title: self.title.clone(),
            added_date: self.added_date,
            is_read: self.is_read,
        }
    }
}

/// The listing projection served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: String,
    pub url: String,
    pub title: String,
    pub added_date: Option<DateTime<Utc>>,
    pub is_read: bool,
}

pub(crate) fn format_bool(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

fn parse_bool(cell: &str) -> bool {
    let cell = cell.trim();
    cell.eq_ignore_ascii_case("true") || cell == "1"
}
