pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stackdock")]
#[command(about = "A read-it-later list with feed ingestion", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/stackdock/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true, conflicts_with = "in_memory")]
    pub db: Option<PathBuf>,

    /// Keep everything in memory; nothing is persisted
    #[arg(long, global = true)]
    pub in_memory: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (and the sweep scheduler)
    Serve {
        /// Address to bind, overriding the config
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overriding the config
        #[arg(short, long)]
        port: Option<u16>,

        /// Don't run the periodic sweeps
        #[arg(long)]
        no_scheduler: bool,
    },
    /// Save an article
    Add {
        /// URL of the article
        url: String,

        /// Title to store instead of fetching the page's
        #[arg(short, long)]
        title: Option<String>,
    },
    /// List saved articles, newest first
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark an article as read
    MarkRead {
        /// Article id
        id: String,
    },
    /// Delete an article
    Delete {
        /// Article id
        id: String,
    },
    /// Re-fetch unread articles and record content changes
    CheckUpdates,
    /// Poll subscribed feeds for new articles
    FetchFeeds,
    /// Manage feed subscriptions
    Feeds {
        #[command(subcommand)]
        action: FeedsAction,
    },
}

#[derive(Subcommand)]
pub enum FeedsAction {
    /// List subscribed feeds
    List,
    /// Subscribe to a feed
    Add {
        /// URL of the RSS/Atom feed
        url: String,
    },
}
