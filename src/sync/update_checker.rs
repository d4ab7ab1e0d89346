use chrono::Utc;

use crate::app::Result;
use crate::domain::article::columns;
use crate::domain::{format_timestamp, Article};
use crate::fetcher::page::digest;
use crate::fetcher::SharedFetcher;
use crate::store::{physical_row, SharedStore, Table};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Unread articles that were fetched successfully.
    pub checked: usize,
    /// Of those, how many had a recorded digest that no longer matches.
    pub changed: usize,
    pub failed: usize,
    /// Read articles and blank rows, never fetched.
    pub skipped: usize,
}

/// Re-fetches unread articles and records content changes.
pub struct UpdateChecker {
    store: SharedStore,
    fetcher: SharedFetcher,
}

impl UpdateChecker {
    pub fn new(store: SharedStore, fetcher: SharedFetcher) -> Self {
        Self { store, fetcher }
    }

    /// One pass over the Articles table.
    ///
    /// A change is only recorded against an existing digest: an article whose
    /// digest is empty keeps it empty. Fetch and write failures are logged,
    /// counted as failed, and the sweep moves on.
    pub async fn run(&self) -> Result<UpdateReport> {
        let rows = self.store.list_rows(Table::Articles)?;
        let mut report = UpdateReport::default();

        for (index, row) in rows.iter().enumerate() {
            let article = Article::from_row(row);
            if article.is_read || article.url.is_empty() {
                report.skipped += 1;
                continue;
            }

            let body = match self.fetcher.fetch(&article.url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Failed to check {}: {}", article.url, e);
                    report.failed += 1;
                    continue;
                }
            };
            report.checked += 1;

            let new_hash = digest(&body);
            if article.content_hash.is_empty() || new_hash == article.content_hash {
                continue;
            }

            if let Err(e) = self.record_change(physical_row(index), &new_hash) {
                tracing::error!("Failed to record change for {}: {}", article.url, e);
                report.failed += 1;
                continue;
            }
            report.changed += 1;
            tracing::info!("Updated: {}", article.url);
        }

        Ok(report)
    }

    /// Writes the digest before `lastChecked`.
    fn record_change(&self, row: usize, new_hash: &str) -> Result<()> {
        let now = format_timestamp(Some(Utc::now()));
        self.store
            .set_cell(Table::Articles, row, columns::CONTENT_HASH, new_hash)?;
        self.store
            .set_cell(Table::Articles, row, columns::LAST_CHECKED, &now)?;
        Ok(())
    }
}
