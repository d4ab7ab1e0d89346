use std::sync::Arc;

use crate::app::{AppContext, Result, StackdockError};
use crate::config::Config;
use crate::scheduler::Scheduler;
use crate::web;

pub async fn serve(
    ctx: Arc<AppContext>,
    config: &Config,
    host: Option<String>,
    port: Option<u16>,
    no_scheduler: bool,
) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr = tokio::net::lookup_host((host.as_str(), port))
        .await?
        .next()
        .ok_or_else(|| StackdockError::Config(format!("Cannot resolve {}:{}", host, port)))?;

    let scheduler = if config.scheduler.enabled && !no_scheduler {
        let scheduler = Scheduler::new(ctx.clone(), &config.scheduler)?;
        Some(tokio::spawn(scheduler.run()))
    } else {
        tracing::info!("Scheduler disabled");
        None
    };

    let result = web::serve(ctx, addr, web::shutdown_signal()).await;

    if let Some(handle) = scheduler {
        handle.abort();
    }
    result
}

pub async fn add_article(ctx: &AppContext, url: &str, title: Option<&str>) -> Result<()> {
    let _guard = ctx.invocation().await;

    let article = ctx.repository.add(url, title).await?;
    println!("Added: {}", article.title);
    println!("  id: {}", article.id);
    Ok(())
}

pub async fn list_articles(ctx: &AppContext, json: bool) -> Result<()> {
    let _guard = ctx.invocation().await;
    let articles = ctx.repository.list()?;

    if json {
        let out = serde_json::to_string_pretty(&articles)
            .map_err(|e| StackdockError::Other(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if articles.is_empty() {
        println!("No articles");
        return Ok(());
    }

    for article in articles {
        let read_marker = if article.is_read { " " } else { "●" };
        let date = article
            .added_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "          ".to_string());

        println!("{} {} {}\n  {}  {}", read_marker, date, article.title, article.id, article.url);
    }

    Ok(())
}

pub async fn mark_read(ctx: &AppContext, id: &str) -> Result<()> {
    let _guard = ctx.invocation().await;
    ctx.repository.mark_read(id)?;
    println!("Marked as read: {}", id);
    Ok(())
}

pub async fn delete_article(ctx: &AppContext, id: &str) -> Result<()> {
    let _guard = ctx.invocation().await;
    ctx.repository.delete(id)?;
    println!("Deleted: {}", id);
    Ok(())
}

pub async fn check_updates(ctx: &AppContext) -> Result<()> {
    let report = ctx.check_updates().await?;
    println!(
        "Update check complete: {} checked, {} changed, {} failed, {} skipped",
        report.checked, report.changed, report.failed, report.skipped
    );
    Ok(())
}

pub async fn fetch_feeds(ctx: &AppContext) -> Result<()> {
    let report = ctx.fetch_feeds().await?;
    if report.feeds == 0 {
        println!("No feeds to poll");
        return Ok(());
    }
    println!(
        "Feed poll complete: {} feeds, {} new articles, {} errors",
        report.feeds, report.added, report.failed
    );
    Ok(())
}

pub async fn list_feeds(ctx: &AppContext) -> Result<()> {
    let _guard = ctx.invocation().await;
    let feeds = ctx.feeds()?;

    if feeds.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for feed in feeds {
        println!("{}\n  last checked: {}", feed.feed_url, feed.display_checked());
    }
    Ok(())
}

pub async fn add_feed(ctx: &AppContext, url: &str) -> Result<()> {
    let _guard = ctx.invocation().await;
    if ctx.subscribe(url)? {
        println!("Added feed: {}", url.trim());
    } else {
        println!("Feed already exists: {}", url.trim());
    }
    Ok(())
}
