//! Periodic sweeps.
//!
//! Runs the update check and the feed ingestion on their own intervals while
//! the server is up, so no system scheduler needs configuring.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::time::{interval, MissedTickBehavior};

use crate::app::{AppContext, Result, StackdockError};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// e.g. "1h", "30m", "1d"
    pub update_interval: String,
    pub feed_interval: String,
    /// Run both sweeps once before the first interval elapses
    pub run_on_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            update_interval: "1h".to_string(),
            feed_interval: "1h".to_string(),
            run_on_start: false,
        }
    }
}

impl SchedulerConfig {
    /// Parse interval string like "1h", "30m", "6h", "1d"
    pub fn parse_interval(s: &str) -> std::result::Result<u64, String> {
        let s = s.trim().to_lowercase();

        let secs = if let Some(hours) = s.strip_suffix('h') {
            scaled(hours, 3600).ok_or_else(|| format!("Invalid hours: {}", hours))
        } else if let Some(minutes) = s.strip_suffix('m') {
            scaled(minutes, 60).ok_or_else(|| format!("Invalid minutes: {}", minutes))
        } else if let Some(days) = s.strip_suffix('d') {
            scaled(days, 86400).ok_or_else(|| format!("Invalid days: {}", days))
        } else if let Some(secs) = s.strip_suffix('s') {
            scaled(secs, 1).ok_or_else(|| format!("Invalid seconds: {}", secs))
        } else {
            scaled(&s, 1).ok_or_else(|| {
                format!("Invalid interval: {}. Use format like '1h', '30m', '1d'", s)
            })
        }?;

        if secs == 0 {
            return Err("Interval must be greater than zero".to_string());
        }
        Ok(secs)
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs % 86400 == 0 {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs % 3600 == 0 {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

/// `count * unit`, or None when `count` isn't a number or the product overflows.
fn scaled(count: &str, unit: u64) -> Option<u64> {
    count.parse::<u64>().ok()?.checked_mul(unit)
}

pub struct Scheduler {
    ctx: Arc<AppContext>,
    update_every: u64,
    feed_every: u64,
    run_on_start: bool,
}

impl Scheduler {
    pub fn new(ctx: Arc<AppContext>, config: &SchedulerConfig) -> Result<Self> {
        let update_every =
            SchedulerConfig::parse_interval(&config.update_interval).map_err(StackdockError::Config)?;
        let feed_every =
            SchedulerConfig::parse_interval(&config.feed_interval).map_err(StackdockError::Config)?;

        Ok(Self {
            ctx,
            update_every,
            feed_every,
            run_on_start: config.run_on_start,
        })
    }

    /// Runs until the task is aborted. Each sweep holds the context's
    /// invocation lock, so it never overlaps a request.
    pub async fn run(self) {
        tracing::info!(
            "Scheduler started (update check every {}, feed poll every {})",
            SchedulerConfig::format_interval(self.update_every),
            SchedulerConfig::format_interval(self.feed_every)
        );

        if self.run_on_start {
            self.update_sweep().await;
            self.feed_sweep().await;
        }

        let mut update_timer = interval(Duration::from_secs(self.update_every));
        let mut feed_timer = interval(Duration::from_secs(self.feed_every));
        update_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        feed_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Skip the first immediate ticks
        update_timer.tick().await;
        feed_timer.tick().await;

        loop {
            tokio::select! {
                _ = update_timer.tick() => {
                    tracing::info!("Running scheduled update check...");
                    self.update_sweep().await;
                }
                _ = feed_timer.tick() => {
                    tracing::info!("Running scheduled feed poll...");
                    self.feed_sweep().await;
                }
            }
        }
    }

    async fn update_sweep(&self) {
        if let Err(e) = self.ctx.check_updates().await {
            tracing::error!("Update check failed: {}", e);
        }
    }

    async fn feed_sweep(&self) {
        if let Err(e) = self.ctx.fetch_feeds().await {
            tracing::error!("Feed poll failed: {}", e);
        }
    }
}
