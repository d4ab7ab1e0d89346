use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::{Result, StackdockError};
use crate::fetcher::Fetcher;

/// Serves canned bodies by URL and remembers every URL it was asked for.
/// URLs without a canned body fail like an unreachable host.
#[derive(Default)]
pub struct StubFetcher {
    bodies: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.set_body(url, body);
        self
    }

    pub fn set_body(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| StackdockError::Fetch(format!("connection refused: {}", url)))
    }
}
