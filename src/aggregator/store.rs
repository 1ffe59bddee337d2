use crate::domain::feed::Feed;
use crate::domain::post::{NewPost, Post};
use crate::error::AppResult;
use crate::infrastructure::repositories::{FeedRepository, PostRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Storage operations consumed by the polling pipeline. The pipeline
/// holds no long-lived feed state; each cycle re-reads what it needs.
#[async_trait]
pub trait AggregatorStore: Send + Sync {
    /// The single feed with the oldest watermark, never-fetched first.
    /// `None` means there is nothing to poll, which is not an error.
    async fn next_feed_to_fetch(&self) -> AppResult<Option<Feed>>;

    /// Advance the feed's freshness watermark.
    async fn mark_feed_fetched(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> AppResult<()>;

    /// Optimistic insert. A duplicate link surfaces as
    /// [`crate::error::AppError::DuplicatePost`]; any other failure is a
    /// storage error.
    async fn create_post(&self, post: &NewPost) -> AppResult<Post>;
}

/// Postgres-backed store, delegating to the repositories.
pub struct PgAggregatorStore {
    feeds: Arc<FeedRepository>,
    posts: Arc<PostRepository>,
}

impl PgAggregatorStore {
    pub fn new(feeds: Arc<FeedRepository>, posts: Arc<PostRepository>) -> Self {
        Self { feeds, posts }
    }
}

#[async_trait]
impl AggregatorStore for PgAggregatorStore {
    async fn next_feed_to_fetch(&self) -> AppResult<Option<Feed>> {
        self.feeds.next_to_fetch().await
    }

    async fn mark_feed_fetched(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> AppResult<()> {
        self.feeds.mark_fetched(feed_id, fetched_at).await
    }

    async fn create_post(&self, post: &NewPost) -> AppResult<Post> {
        self.posts.create(post).await
    }
}
