//! In-memory implementation of the storage seam for pipeline tests,
//! mirroring the ordering and uniqueness contract of the Postgres
//! queries.

use crate::aggregator::store::AggregatorStore;
use crate::domain::feed::Feed;
use crate::domain::post::{NewPost, Post};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStore {
    feeds: Mutex<Vec<Feed>>,
    posts: Mutex<Vec<Post>>,
    failing_url: Mutex<Option<String>>,
    fail_feed_query: AtomicBool,
}

impl InMemoryStore {
    pub fn add_feed(&self, feed: Feed) {
        self.feeds.lock().unwrap().push(feed);
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    pub fn last_fetched_at(&self, feed_id: Uuid) -> Option<DateTime<Utc>> {
        self.feeds
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == feed_id)
            .and_then(|f| f.last_fetched_at)
    }

    /// Make inserts for the given link fail with a non-duplicate storage
    /// error.
    pub fn fail_inserts_for(&self, url: &str) {
        *self.failing_url.lock().unwrap() = Some(url.to_string());
    }

    pub fn fail_next_feed_query(&self) {
        self.fail_feed_query.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AggregatorStore for InMemoryStore {
    async fn next_feed_to_fetch(&self) -> AppResult<Option<Feed>> {
        if self.fail_feed_query.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }

        let feeds = self.feeds.lock().unwrap();
        // last_fetched_at ASC NULLS FIRST, created_at ASC
        let next = feeds
            .iter()
            .min_by_key(|f| (f.last_fetched_at.is_some(), f.last_fetched_at, f.created_at))
            .cloned();
        Ok(next)
    }

    async fn mark_feed_fetched(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> AppResult<()> {
        let mut feeds = self.feeds.lock().unwrap();
        if let Some(feed) = feeds.iter_mut().find(|f| f.id == feed_id) {
            feed.last_fetched_at = Some(fetched_at);
            feed.updated_at = fetched_at;
        }
        Ok(())
    }

    async fn create_post(&self, post: &NewPost) -> AppResult<Post> {
        if self.failing_url.lock().unwrap().as_deref() == Some(post.url.as_str()) {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }

        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|p| p.url == post.url) {
            return Err(AppError::DuplicatePost(post.url.clone()));
        }

        let stored = Post {
            id: post.id,
            created_at: post.created_at,
            updated_at: post.updated_at,
            title: post.title.clone(),
            url: post.url.clone(),
            description: post.description.clone(),
            published_at: post.published_at,
            feed_id: post.feed_id,
        };
        posts.push(stored.clone());
        Ok(stored)
    }
}

/// A feed row with a fresh identity and no watermark.
pub fn sample_feed(url: &str) -> Feed {
    let now = Utc::now();
    Feed {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        name: "Test Feed".to_string(),
        url: url.to_string(),
        user_id: Uuid::new_v4(),
        last_fetched_at: None,
    }
}
