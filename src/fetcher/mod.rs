pub mod http_fetcher;
pub mod page;
#[cfg(test)]
pub mod stub;

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::Result;

pub use http_fetcher::HttpFetcher;
pub use page::FetchedPage;

/// Raw GET transport. Any transport failure, timeout or non-2xx status is
/// an error.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub type SharedFetcher = Arc<dyn Fetcher + Send + Sync>;

/// Fetches `url` and interprets the body as an HTML page.
pub async fn fetch_page(fetcher: &(dyn Fetcher + Send + Sync), url: &str) -> Result<FetchedPage> {
    let body = fetcher.fetch(url).await?;
    Ok(FetchedPage::from_body(&body))
}
