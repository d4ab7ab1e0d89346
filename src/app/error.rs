use thiserror::Error;

use crate::store::Table;

#[derive(Error, Debug)]
pub enum StackdockError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Item not found: {0}")]
    ArticleNotFound(String),

    #[error("Invalid action")]
    InvalidAction(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Row {row} is outside the {table} table")]
    RowOutOfRange { table: Table, row: usize },

    #[error("Column {column} is outside the {table} table")]
    ColumnOutOfRange { table: Table, column: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl StackdockError {
    /// True for the failures the content fetcher reports: bad URL, transport
    /// error, timeout or a non-2xx status.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            StackdockError::Http(_) | StackdockError::Fetch(_) | StackdockError::InvalidUrl(_)
        )
    }
}

impl From<serde_json::Error> for StackdockError {
    fn from(err: serde_json::Error) -> Self {
        StackdockError::InvalidRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StackdockError>;
