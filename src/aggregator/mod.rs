//! The feed-polling pipeline: selection of the next feed to refresh,
//! fetch-and-parse of remote XML, timestamp normalization, and idempotent
//! persistence of posts.

pub mod fetch;
pub mod ingest;
pub mod scheduler;
pub mod store;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod testing;

pub use fetch::{FeedFetcher, RawFeedDocument, RawFeedEntry};
pub use ingest::PostIngestor;
pub use scheduler::{CycleOutcome, PollScheduler};
pub use store::{AggregatorStore, PgAggregatorStore};
pub use timestamp::normalize_pub_date;
