use crate::aggregator::fetch::FeedFetcher;
use crate::aggregator::ingest::PostIngestor;
use crate::aggregator::store::AggregatorStore;
use crate::error::AppResult;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Outcome of one polling cycle.
#[derive(Debug, PartialEq)]
pub enum CycleOutcome {
    /// No feed exists at all; wait for the next tick.
    NoFeeds,
    /// One feed was fetched and ingested.
    Fetched { feed_url: String, new_posts: usize },
}

/// Drives one ingestion cycle at a fixed interval, indefinitely. Cycles
/// never overlap; a cycle runs to completion before the next tick fires.
pub struct PollScheduler {
    store: Arc<dyn AggregatorStore>,
    fetcher: FeedFetcher,
    ingestor: PostIngestor,
    interval: Duration,
}

impl PollScheduler {
    pub fn new(store: Arc<dyn AggregatorStore>, fetcher: FeedFetcher, interval: Duration) -> Self {
        let ingestor = PostIngestor::new(store.clone());
        Self {
            store,
            fetcher,
            ingestor,
            interval,
        }
    }

    /// Run the polling loop: one cycle immediately, then one per
    /// interval. Fetch, parse and timestamp failures are logged and
    /// retried at the next tick; storage failures terminate the loop.
    pub async fn run(&self) -> AppResult<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match self.run_cycle().await {
                Ok(CycleOutcome::NoFeeds) => {
                    tracing::info!("No feeds available; nothing to do this cycle");
                }
                Ok(CycleOutcome::Fetched {
                    feed_url,
                    new_posts,
                }) => {
                    tracing::info!(feed = %feed_url, new_posts, "Cycle complete");
                }
                Err(e) if e.is_recoverable_cycle_error() => {
                    tracing::warn!(error = %e, "Feed cycle failed; retrying at next tick");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Polling loop terminating");
                    return Err(e);
                }
            }
        }
    }

    /// One complete fetch-parse-ingest pass for the most-stale feed.
    pub async fn run_cycle(&self) -> AppResult<CycleOutcome> {
        let Some(feed) = self.store.next_feed_to_fetch().await? else {
            return Ok(CycleOutcome::NoFeeds);
        };

        // Advance the watermark before fetching so a feed that fails
        // mid-cycle rotates to the back of the queue instead of being
        // retried on every tick.
        self.store.mark_feed_fetched(feed.id, Utc::now()).await?;

        let document = self.fetcher.fetch(&feed.url).await?;
        let new_posts = self.ingestor.ingest(&feed, &document).await?;

        Ok(CycleOutcome::Fetched {
            feed_url: feed.url,
            new_posts,
        })
    }
}
