use super::CommandContext;
use crate::aggregator::{FeedFetcher, PgAggregatorStore, PollScheduler};
use crate::error::AppResult;
use std::sync::Arc;
use std::time::Duration;

/// Run the poll scheduler until it fails or the process is interrupted.
pub async fn run(ctx: &CommandContext, interval: Duration) -> AppResult<()> {
    let store = Arc::new(PgAggregatorStore::new(ctx.feeds.clone(), ctx.posts.clone()));
    let fetcher = FeedFetcher::new()?;
    let scheduler = PollScheduler::new(store, fetcher, interval);

    println!(
        "Collecting the first feed now; afterwards every {}",
        humantime::format_duration(interval)
    );

    tokio::select! {
        result = scheduler.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted; shutting down");
            Ok(())
        }
    }
}
