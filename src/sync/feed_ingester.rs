use chrono::Utc;

use crate::app::{Result, StackdockError};
use crate::domain::feed::columns;
use crate::domain::{format_timestamp, FeedSubscription};
use crate::fetcher::SharedFetcher;
use crate::normalizer::Normalizer;
use crate::repository::ArticleRepository;
use crate::store::{physical_row, SharedStore, Table};

pub const DEFAULT_MAX_ITEMS_PER_FEED: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Feeds with a url that were polled.
    pub feeds: usize,
    /// Articles created across all feeds.
    pub added: usize,
    /// Feeds skipped because they could not be fetched, parsed or stored.
    pub failed: usize,
}

/// Pulls new entries from every subscribed feed into the Articles table.
pub struct FeedIngester {
    store: SharedStore,
    fetcher: SharedFetcher,
    repository: ArticleRepository,
    normalizer: Normalizer,
    max_items: usize,
}

impl FeedIngester {
    pub fn new(
        store: SharedStore,
        fetcher: SharedFetcher,
        repository: ArticleRepository,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            store,
            fetcher,
            repository,
            normalizer,
            max_items: DEFAULT_MAX_ITEMS_PER_FEED,
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// One pass over the Feeds table. A failing feed is logged and skipped and
    /// keeps its previous `lastChecked`; the remaining feeds still run. That
    /// includes failing to write `lastChecked` itself.
    pub async fn run(&self) -> Result<IngestReport> {
        let rows = self.store.list_rows(Table::Feeds)?;
        let mut report = IngestReport::default();

        for (index, row) in rows.iter().enumerate() {
            let feed = FeedSubscription::from_row(row);
            if feed.feed_url.is_empty() {
                continue;
            }
            report.feeds += 1;

            let added = match self.ingest_feed(&feed).await {
                Ok(added) => added,
                Err(e) => {
                    report.failed += 1;
                    if e.is_fetch_error() || matches!(e, StackdockError::FeedParse(_)) {
                        tracing::warn!("Failed to fetch RSS {}: {}", feed.feed_url, e);
                    } else {
                        tracing::error!("Failed to ingest {}: {}", feed.feed_url, e);
                    }
                    continue;
                }
            };
            report.added += added;

            let now = format_timestamp(Some(Utc::now()));
            if let Err(e) =
                self.store
                    .set_cell(Table::Feeds, physical_row(index), columns::LAST_CHECKED, &now)
            {
                report.failed += 1;
                tracing::error!("Failed to record poll of {}: {}", feed.feed_url, e);
                continue;
            }
            tracing::debug!("{} new articles from {}", added, feed.feed_url);
        }

        Ok(report)
    }

    /// Adds the unseen entries among the first `max_items` of one feed.
    async fn ingest_feed(&self, feed: &FeedSubscription) -> Result<usize> {
        let body = self.fetcher.fetch(&feed.feed_url).await?;
        let parsed = self.normalizer.normalize(&body)?;

        let mut added = 0;
        for entry in parsed.entries.into_iter().take(self.max_items) {
            let Some(link) = entry.link else {
                tracing::debug!("Skipping entry without a link in {}", feed.feed_url);
                continue;
            };

            if self.repository.exists_by_url(&link)? {
                continue;
            }

            self.repository.add(&link, entry.title.as_deref()).await?;
            added += 1;
        }

        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::Article;
    use crate::fetcher::stub::StubFetcher;
    use crate::store::failing::FailingStore;
    use crate::store::{MemoryTableStore, TableStore};

    fn rss(items: &[(&str, &str)]) -> String {
        let items: String = items
            .iter()
            .map(|(title, link)| {
                format!("<item><title>{}</title><link>{}</link></item>", title, link)
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Feed</title>{}</channel></rss>"#,
            items
        )
    }

    fn numbered_items(n: usize) -> Vec<(String, String)> {
        (1..=n)
            .map(|i| (format!("Item {}", i), format!("https://example.com/{}", i)))
            .collect()
    }

    fn rss_numbered(n: usize) -> String {
        let items = numbered_items(n);
        let pairs: Vec<(&str, &str)> = items
            .iter()
            .map(|(t, l)| (t.as_str(), l.as_str()))
            .collect();
        rss(&pairs)
    }

    fn ingester(store: &Arc<MemoryTableStore>, fetcher: &Arc<StubFetcher>) -> FeedIngester {
        let repository = ArticleRepository::new(store.clone(), fetcher.clone());
        FeedIngester::new(store.clone(), fetcher.clone(), repository, Normalizer::new())
    }

    fn subscribe(store: &MemoryTableStore, url: &str) {
        store
            .append_row(Table::Feeds, FeedSubscription::new(url.into()).to_row())
            .unwrap();
    }

    fn feeds(store: &MemoryTableStore) -> Vec<FeedSubscription> {
        store
            .list_rows(Table::Feeds)
            .unwrap()
            .iter()
            .map(|r| FeedSubscription::from_row(r))
            .collect()
    }

    fn articles(store: &MemoryTableStore) -> Vec<Article> {
        store
            .list_rows(Table::Articles)
            .unwrap()
            .iter()
            .map(|r| Article::from_row(r))
            .collect()
    }

    #[tokio::test]
    async fn test_sweep_takes_first_five_items_in_order() {
        let store = Arc::new(MemoryTableStore::new());
        subscribe(&store, "https://example.com/feed.xml");
        let fetcher =
            Arc::new(StubFetcher::new().with_body("https://example.com/feed.xml", rss_numbered(7)));

        let before = Utc::now();
        let report = ingester(&store, &fetcher).run().await.unwrap();
        let after = Utc::now();

        assert_eq!(
            report,
            IngestReport {
                feeds: 1,
                added: 5,
                failed: 0
            }
        );

        let saved = articles(&store);
        assert_eq!(saved.len(), 5);
        for (article, (title, link)) in saved.iter().zip(numbered_items(5)) {
            assert_eq!(article.title, title);
            assert_eq!(article.url, link);
            assert!(!article.is_read);
        }

        // Titles came from the feed, so no page was fetched.
        assert_eq!(fetcher.requests(), vec!["https://example.com/feed.xml"]);

        let checked = feeds(&store)[0].last_checked.unwrap();
        assert!(checked >= before && checked <= after);
    }

    #[tokio::test]
    async fn test_existing_links_are_not_duplicated() {
        let store = Arc::new(MemoryTableStore::new());
        subscribe(&store, "https://example.com/feed.xml");
        let fetcher =
            Arc::new(StubFetcher::new().with_body("https://example.com/feed.xml", rss_numbered(3)));
        let ingester = ingester(&store, &fetcher);

        let repository = ArticleRepository::new(store.clone(), fetcher.clone());
        repository
            .add("https://example.com/2", Some("Saved by hand"))
            .await
            .unwrap();

        let first = ingester.run().await.unwrap();
        let second = ingester.run().await.unwrap();

        assert_eq!(first.added, 2);
        assert_eq!(second.added, 0);

        let urls: Vec<_> = articles(&store).into_iter().map(|a| a.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/2",
                "https://example.com/1",
                "https://example.com/3"
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_check_is_case_sensitive() {
        let store = Arc::new(MemoryTableStore::new());
        subscribe(&store, "https://example.com/feed.xml");
        let fetcher = Arc::new(StubFetcher::new().with_body(
            "https://example.com/feed.xml",
            rss(&[("Upper", "https://example.com/Post")]),
        ));
        ArticleRepository::new(store.clone(), fetcher.clone())
            .add("https://example.com/post", Some("lower"))
            .await
            .unwrap();

        let report = ingester(&store, &fetcher).run().await.unwrap();

        assert_eq!(report.added, 1);
        assert_eq!(articles(&store).len(), 2);
    }

    #[tokio::test]
    async fn test_failed_feed_keeps_last_checked() {
        let store = Arc::new(MemoryTableStore::new());
        subscribe(&store, "https://down.test/feed.xml");
        subscribe(&store, "https://example.com/broken.xml");
        subscribe(&store, "https://example.com/feed.xml");
        let fetcher = Arc::new(
            StubFetcher::new()
                .with_body("https://example.com/broken.xml", "<html>nope</html>")
                .with_body("https://example.com/feed.xml", rss_numbered(1)),
        );

        let report = ingester(&store, &fetcher).run().await.unwrap();

        assert_eq!(report.failed, 2);
        assert_eq!(report.added, 1);

        let feeds = feeds(&store);
        assert!(feeds[0].last_checked.is_none());
        assert!(feeds[1].last_checked.is_none());
        assert!(feeds[2].last_checked.is_some());
    }

    #[tokio::test]
    async fn test_blank_feed_rows_are_ignored() {
        let store = Arc::new(MemoryTableStore::new());
        subscribe(&store, "");
        let fetcher = Arc::new(StubFetcher::new());

        let report = ingester(&store, &fetcher).run().await.unwrap();

        assert_eq!(report, IngestReport::default());
        assert_eq!(fetcher.request_count(), 0);
        assert!(feeds(&store)[0].last_checked.is_none());
    }

    #[tokio::test]
    async fn test_cap_counts_entries_without_links() {
        let store = Arc::new(MemoryTableStore::new());
        subscribe(&store, "https://example.com/feed.xml");
        let body = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>F</title>
            <item><title>No link</title></item>
            <item><title>A</title><link>https://example.com/a</link></item>
            <item><title>B</title><link>https://example.com/b</link></item>
        </channel></rss>"#;
        let fetcher = Arc::new(StubFetcher::new().with_body("https://example.com/feed.xml", body));

        let report = ingester(&store, &fetcher)
            .with_max_items(2)
            .run()
            .await
            .unwrap();

        assert_eq!(report.added, 1);
        assert_eq!(articles(&store)[0].url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_entry_without_title_is_fetched_for_one() {
        let store = Arc::new(MemoryTableStore::new());
        subscribe(&store, "https://example.com/feed.xml");
        let body = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>F</title>
            <item><link>https://example.com/untitled</link></item>
        </channel></rss>"#;
        let fetcher = Arc::new(
            StubFetcher::new()
                .with_body("https://example.com/feed.xml", body)
                .with_body("https://example.com/untitled", "<title>From Page</title>"),
        );

        ingester(&store, &fetcher).run().await.unwrap();

        assert_eq!(articles(&store)[0].title, "From Page");
        assert_eq!(fetcher.request_count(), 2);
    }

    #[tokio::test]
    async fn test_last_checked_write_failure_does_not_stop_sweep() {
        let store = Arc::new(FailingStore::failing_on(Table::Feeds, 2));
        subscribe(store.inner(), "https://example.com/a.xml");
        subscribe(store.inner(), "https://example.com/b.xml");
        let fetcher = Arc::new(
            StubFetcher::new()
                .with_body("https://example.com/a.xml", rss(&[("A", "https://example.com/a")]))
                .with_body("https://example.com/b.xml", rss(&[("B", "https://example.com/b")])),
        );
        let repository = ArticleRepository::new(store.clone(), fetcher.clone());
        let ingester =
            FeedIngester::new(store.clone(), fetcher.clone(), repository, Normalizer::new());

        let report = ingester.run().await.unwrap();

        assert_eq!(
            report,
            IngestReport {
                feeds: 2,
                added: 2,
                failed: 1
            }
        );
        let feeds = feeds(store.inner());
        assert!(feeds[0].last_checked.is_none());
        assert!(feeds[1].last_checked.is_some());
        assert_eq!(articles(store.inner()).len(), 2);
    }
}
