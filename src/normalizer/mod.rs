use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{Result, StackdockError};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub link: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub title: Option<String>,
    /// Entries in the order the document lists them.
    pub entries: Vec<FeedEntry>,
}

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parses RSS 0.9x/1.0/2.0, Atom or JSON Feed into link/title pairs.
    pub fn normalize(&self, body: &[u8]) -> Result<ParsedFeed> {
        let feed = parser::parse(body).map_err(|e| StackdockError::FeedParse(e.to_string()))?;

        let entries = feed
            .entries
            .into_iter()
            .map(|entry| FeedEntry {
                link: entry
                    .links
                    .first()
                    .map(|l| l.href.trim().to_string())
                    .filter(|href| !href.is_empty()),
                title: entry
                    .title
                    .map(|t| decode_html_entities(t.content.trim()).to_string())
                    .filter(|t| !t.is_empty()),
            })
            .collect();

        Ok(ParsedFeed {
            title: feed.title.map(|t| decode_html_entities(&t.content).to_string()),
            entries,
        })
    }
}
