//! The two maintenance sweeps: content-change checks over unread articles
//! and ingestion of new entries from subscribed feeds.

pub mod feed_ingester;
pub mod update_checker;

pub use feed_ingester::{FeedIngester, IngestReport, DEFAULT_MAX_ITEMS_PER_FEED};
pub use update_checker::{UpdateChecker, UpdateReport};
