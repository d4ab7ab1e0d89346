use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{cell, format_timestamp, parse_timestamp};
use crate::store::Row;

/// 1-based column positions in the Feeds table.
pub mod columns {
    pub const FEED_URL: usize = 1;
    pub const LAST_CHECKED: usize = 2;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSubscription {
    pub feed_url: String,
    pub last_checked: Option<DateTime<Utc>>,
}

impl FeedSubscription {
    pub fn new(feed_url: String) -> Self {
        Self {
            feed_url,
            last_checked: None,
        }
    }

    pub fn from_row(row: &[String]) -> Self {
        Self {
            feed_url: cell(row, columns::FEED_URL).trim().to_string(),
            last_checked: parse_timestamp(cell(row, columns::LAST_CHECKED)),
        }
    }

    pub fn to_row(&self) -> Row {
        vec![self.feed_url.clone(), format_timestamp(self.last_checked)]
    }

    pub fn display_checked(&self) -> String {
        self.last_checked
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string())
    }
}
