use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::app::Result;
use crate::config::FetcherConfig;
use crate::fetcher::Fetcher;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_config(&FetcherConfig::default())
    }

    pub fn with_config(config: &FetcherConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.clone())
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(url)?;

        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;

        let final_url = response.url().to_string();
        let body = response.bytes().await?.to_vec();
        tracing::debug!("Fetched {} bytes from {}", body.len(), final_url);

        Ok(body)
    }
}
