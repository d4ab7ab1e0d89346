//! # Stackdock
//!
//! A small read-it-later service: save links, mark them read, and let
//! subscribed RSS/Atom feeds and content-change checks keep the list fresh.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Repository → Store
//!    ↓          ↑
//! Normalizer → Sync (update check, feed ingestion) ← Scheduler
//!               Web / CLI → Repository
//! ```
//!
//! Everything persists through a two-table tabular store ("Articles" and
//! "Feeds") addressed by 1-based rows and columns, with row 1 holding the
//! header.
//!
//! ## Quick Start
//!
//! ```bash
//! # Save an article
//! stackdock add https://example.com/post
//!
//! # Subscribe to a feed and poll it
//! stackdock feeds add https://blog.rust-lang.org/feed.xml
//! stackdock fetch-feeds
//!
//! # Serve the HTTP API and page, with periodic sweeps
//! stackdock serve
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// fetcher, repository and sweeps, and serialises invocations.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/stackdock/config.toml`.
pub mod config;

/// Article and feed subscription records, and their row layouts.
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for GET requests
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`FetchedPage`](fetcher::FetchedPage): body, `<title>` and digest
pub mod fetcher;

/// RSS/Atom parsing down to `(link, title)` entries.
pub mod normalizer;

/// CRUD over the Articles table.
pub mod repository;

/// Background sweeps while serving.
pub mod scheduler;

/// Tabular persistence.
///
/// - [`TableStore`](store::TableStore): row/cell facade over the two tables
/// - [`SqliteTableStore`](store::SqliteTableStore): SQLite implementation
/// - [`MemoryTableStore`](store::MemoryTableStore): volatile implementation
pub mod store;

/// Update checking and feed ingestion.
pub mod sync;

/// HTTP API and rendered listing page, built with axum.
pub mod web;
