//! Article CRUD over the Articles table.
//!
//! Every operation re-reads the whole table and scans it linearly; nothing is
//! cached between calls.

use crate::app::{Result, StackdockError};
use crate::domain::article::{columns, format_bool};
use crate::domain::{Article, ArticleSummary};
use crate::fetcher::{fetch_page, SharedFetcher};
use crate::store::{physical_row, SharedStore, Table};

#[derive(Clone)]
pub struct ArticleRepository {
    store: SharedStore,
    fetcher: SharedFetcher,
}

impl ArticleRepository {
    pub fn new(store: SharedStore, fetcher: SharedFetcher) -> Self {
        Self { store, fetcher }
    }

    /// Saves `url` as a new unread article.
    ///
    /// Without a title the page is fetched once to pick up its `<title>` and
    /// a baseline digest. A failed fetch is not an error: the url doubles as
    /// the title and the digest stays empty. No duplicate check happens here.
    pub async fn add(&self, url: &str, title: Option<&str>) -> Result<Article> {
        let article = match title.filter(|t| !t.is_empty()) {
            Some(title) => Article::new(url.to_string(), title.to_string(), String::new()),
            None => match fetch_page(self.fetcher.as_ref(), url).await {
                Ok(page) => {
                    let title = page.title.unwrap_or_else(|| url.to_string());
                    Article::new(url.to_string(), title, page.digest)
                }
                Err(e) => {
                    tracing::warn!("Could not fetch {} while adding it: {}", url, e);
                    Article::new(url.to_string(), url.to_string(), String::new())
                }
            },
        };

        self.store.append_row(Table::Articles, article.to_row())?;
        tracing::info!("Added article {} ({})", article.id, article.url);

        Ok(article)
    }

    pub fn mark_read(&self, id: &str) -> Result<()> {
        let row = self.find_row(id)?;
        self.store
            .set_cell(Table::Articles, row, columns::IS_READ, &format_bool(true))?;
        tracing::debug!("Marked {} as read", id);
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let row = self.find_row(id)?;
        self.store.delete_row(Table::Articles, row)?;
        tracing::info!("Deleted article {}", id);
        Ok(())
    }

    /// Newest first. Rows with an empty url are left out.
    pub fn list(&self) -> Result<Vec<ArticleSummary>> {
        let rows = self.store.list_rows(Table::Articles)?;
        let summaries = rows
            .iter()
            .rev()
            .map(|row| Article::from_row(row))
            .filter(|article| !article.url.is_empty())
            .map(|article| article.summary())
            .collect();
        Ok(summaries)
    }

    /// Exact, case-sensitive url match.
    pub fn exists_by_url(&self, url: &str) -> Result<bool> {
        let rows = self.store.list_rows(Table::Articles)?;
        Ok(rows
            .iter()
            .any(|row| row.get(columns::URL - 1).is_some_and(|u| u == url)))
    }

    /// Physical row of the first article with this id.
    fn find_row(&self, id: &str) -> Result<usize> {
        if id.is_empty() {
            return Err(StackdockError::ArticleNotFound(id.to_string()));
        }

        self.store
            .list_rows(Table::Articles)?
            .iter()
            .position(|row| row.get(columns::ID - 1).is_some_and(|r| r == id))
            .map(physical_row)
            .ok_or_else(|| StackdockError::ArticleNotFound(id.to_string()))
    }
}
