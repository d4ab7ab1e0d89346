use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;
use sha2::{Digest, Sha256};

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title(?:\s[^>]*)?>(.*?)</title\s*>").expect("title pattern is valid")
});

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub body: String,
    pub title: Option<String>,
    pub digest: String,
}

impl FetchedPage {
    pub fn from_body(body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body).into_owned();
        let title = extract_title(&text);
        Self {
            body: text,
            title,
            digest: digest(body),
        }
    }
}

/// Text of the first `<title>` element, entity-decoded and trimmed.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.captures(html)?.get(1)?.as_str();
    let title = decode_html_entities(raw).trim().to_string();
    (!title.is_empty()).then_some(title)
}

/// Hex SHA-256 of the exact body bytes. Only used to notice changes.
pub fn digest(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}
