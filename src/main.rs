use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stackdock::app::AppContext;
use stackdock::cli::{commands, Cli, Commands, FeedsAction};
use stackdock::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stackdock=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let ctx = if cli.in_memory {
        AppContext::in_memory(&config)
    } else {
        AppContext::new(&config, cli.db.clone())?
    };
    let ctx = Arc::new(ctx);

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_scheduler,
        } => {
            commands::serve(ctx, &config, host, port, no_scheduler).await?;
        }
        Commands::Add { url, title } => {
            commands::add_article(&ctx, &url, title.as_deref()).await?;
        }
        Commands::List { json } => {
            commands::list_articles(&ctx, json).await?;
        }
        Commands::MarkRead { id } => {
            commands::mark_read(&ctx, &id).await?;
        }
        Commands::Delete { id } => {
            commands::delete_article(&ctx, &id).await?;
        }
        Commands::CheckUpdates => {
            commands::check_updates(&ctx).await?;
        }
        Commands::FetchFeeds => {
            commands::fetch_feeds(&ctx).await?;
        }
        Commands::Feeds { action } => match action {
            FeedsAction::List => commands::list_feeds(&ctx).await?,
            FeedsAction::Add { url } => commands::add_feed(&ctx, &url).await?,
        },
    }

    Ok(())
}
