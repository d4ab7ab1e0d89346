use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, MutexGuard};

use crate::app::error::{Result, StackdockError};
use crate::config::Config;
use crate::domain::FeedSubscription;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::SharedFetcher;
use crate::normalizer::Normalizer;
use crate::repository::ArticleRepository;
use crate::store::{MemoryTableStore, SharedStore, SqliteTableStore, Table};
use crate::sync::{FeedIngester, IngestReport, UpdateChecker, UpdateReport};

/// Wires the store, fetcher and the components built on them. Every entry
/// point (request handler, sweep, CLI command) runs under `invocation()`, so
/// invocations never overlap.
pub struct AppContext {
    pub store: SharedStore,
    pub fetcher: SharedFetcher,
    pub repository: ArticleRepository,
    pub update_checker: UpdateChecker,
    pub feed_ingester: FeedIngester,
    invocation: Mutex<()>,
}

impl AppContext {
    pub fn new(config: &Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => config
                .database_path()
                .map_err(|e| StackdockError::Config(e.to_string()))?,
        };

        let store: SharedStore = Arc::new(SqliteTableStore::new(&db_path)?);
        let fetcher: SharedFetcher = Arc::new(HttpFetcher::with_config(&config.fetcher));
        tracing::debug!("Using database at {}", db_path.display());

        Ok(Self::with_parts(store, fetcher, config.ingest.max_items_per_feed))
    }

    /// Volatile tables, real network. Nothing survives the process.
    pub fn in_memory(config: &Config) -> Self {
        let store: SharedStore = Arc::new(MemoryTableStore::new());
        let fetcher: SharedFetcher = Arc::new(HttpFetcher::with_config(&config.fetcher));
        Self::with_parts(store, fetcher, config.ingest.max_items_per_feed)
    }

    pub fn with_parts(store: SharedStore, fetcher: SharedFetcher, max_items_per_feed: usize) -> Self {
        let repository = ArticleRepository::new(store.clone(), fetcher.clone());
        let update_checker = UpdateChecker::new(store.clone(), fetcher.clone());
        let feed_ingester = FeedIngester::new(
            store.clone(),
            fetcher.clone(),
            repository.clone(),
            Normalizer::new(),
        )
        .with_max_items(max_items_per_feed);

        Self {
            store,
            fetcher,
            repository,
            update_checker,
            feed_ingester,
            invocation: Mutex::new(()),
        }
    }

    /// Held for the duration of one request or sweep.
    pub async fn invocation(&self) -> MutexGuard<'_, ()> {
        self.invocation.lock().await
    }

    /// One update-check sweep, serialised with every other invocation.
    pub async fn check_updates(&self) -> Result<UpdateReport> {
        let _guard = self.invocation().await;
        let start = Instant::now();

        let report = self.update_checker.run().await?;
        tracing::info!(
            "Update check complete: {} checked, {} changed, {} failed, {} skipped ({:.1}s)",
            report.checked,
            report.changed,
            report.failed,
            report.skipped,
            start.elapsed().as_secs_f64()
        );
        Ok(report)
    }

    /// One feed-ingestion sweep, serialised with every other invocation.
    pub async fn fetch_feeds(&self) -> Result<IngestReport> {
        let _guard = self.invocation().await;
        let start = Instant::now();

        let report = self.feed_ingester.run().await?;
        tracing::info!(
            "Feed poll complete: {} feeds, {} new articles, {} failed ({:.1}s)",
            report.feeds,
            report.added,
            report.failed,
            start.elapsed().as_secs_f64()
        );
        Ok(report)
    }

    pub fn feeds(&self) -> Result<Vec<FeedSubscription>> {
        let feeds = self
            .store
            .list_rows(Table::Feeds)?
            .iter()
            .map(|row| FeedSubscription::from_row(row))
            .filter(|feed| !feed.feed_url.is_empty())
            .collect();
        Ok(feeds)
    }

    /// Provisions a Feeds row. Returns false if the url is already subscribed.
    pub fn subscribe(&self, feed_url: &str) -> Result<bool> {
        let feed_url = feed_url.trim();
        if feed_url.is_empty() {
            return Err(StackdockError::InvalidRequest("feed url is empty".into()));
        }
        if self.feeds()?.iter().any(|f| f.feed_url == feed_url) {
            return Ok(false);
        }

        let feed = FeedSubscription::new(feed_url.to_string());
        self.store.append_row(Table::Feeds, feed.to_row())?;
        tracing::info!("Subscribed to {}", feed_url);
        Ok(true)
    }
}
