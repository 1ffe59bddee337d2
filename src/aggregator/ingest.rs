use crate::aggregator::fetch::RawFeedDocument;
use crate::aggregator::store::AggregatorStore;
use crate::aggregator::timestamp::normalize_pub_date;
use crate::domain::feed::Feed;
use crate::domain::post::NewPost;
use crate::error::{AppError, AppResult};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Converts fetched entries into persisted post records, de-duplicating
/// on the entry link.
pub struct PostIngestor {
    store: Arc<dyn AggregatorStore>,
}

impl PostIngestor {
    pub fn new(store: Arc<dyn AggregatorStore>) -> Self {
        Self { store }
    }

    /// Persist new posts from one fetched document, in document order.
    /// Returns the number of newly created posts.
    ///
    /// A duplicate link is an expected outcome of the optimistic insert
    /// and is skipped silently. An unparseable publication date aborts
    /// the remaining entries of this feed; so does any other storage
    /// failure.
    pub async fn ingest(&self, feed: &Feed, document: &RawFeedDocument) -> AppResult<usize> {
        let mut created = 0;

        for entry in &document.entries {
            let published_at = normalize_pub_date(&entry.pub_date)?;
            let now = Utc::now();

            let post = NewPost {
                id: Uuid::new_v4(),
                created_at: now,
                updated_at: now,
                title: entry.title.clone(),
                url: entry.link.clone(),
                description: entry.description.clone(),
                published_at,
                feed_id: feed.id,
            };

            match self.store.create_post(&post).await {
                Ok(stored) => {
                    created += 1;
                    tracing::debug!(feed = %feed.url, url = %stored.url, "Stored new post");
                }
                Err(AppError::DuplicatePost(url)) => {
                    tracing::trace!(feed = %feed.url, url = %url, "Skipping already-seen post");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(created)
    }
}
