use crate::infrastructure::db::DbPool;
use crate::{
    domain::feed::Feed,
    error::{AppError, AppResult},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

pub struct FeedRepository {
    pool: Arc<DbPool>,
}

impl FeedRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Get a feed by its canonical URL
    pub async fn find_by_url(&self, url: &str) -> AppResult<Option<Feed>> {
        let pool = self.pool.as_ref();
        let feed = sqlx::query_as::<_, Feed>("SELECT * FROM feeds WHERE url = $1")
            .bind(url)
            .fetch_optional(pool)
            .await?;

        Ok(feed)
    }

    /// List all feeds, oldest first
    pub async fn find_all(&self) -> AppResult<Vec<Feed>> {
        let pool = self.pool.as_ref();
        let feeds = sqlx::query_as::<_, Feed>("SELECT * FROM feeds ORDER BY created_at")
            .fetch_all(pool)
            .await?;

        Ok(feeds)
    }

    /// Create a new feed owned by the given user
    pub async fn create(&self, name: &str, url: &str, user_id: Uuid) -> AppResult<Feed> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let feed = sqlx::query_as::<_, Feed>(
            r#"
            INSERT INTO feeds (id, created_at, updated_at, name, url, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(now)
        .bind(name)
        .bind(url)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(format!("Feed URL already exists: {}", url));
                }
            }
            AppError::Database(e)
        })?;

        Ok(feed)
    }

    /// Select the single most-stale feed: last_fetched_at ascending with
    /// never-fetched feeds first, created_at as a deterministic tie-break.
    pub async fn next_to_fetch(&self) -> AppResult<Option<Feed>> {
        let pool = self.pool.as_ref();
        let feed = sqlx::query_as::<_, Feed>(
            r#"
            SELECT * FROM feeds
            ORDER BY last_fetched_at ASC NULLS FIRST, created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await?;

        Ok(feed)
    }

    /// Advance the freshness watermark for a feed
    pub async fn mark_fetched(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE feeds
            SET last_fetched_at = $1, updated_at = $1
            WHERE id = $2
            "#,
        )
        .bind(fetched_at)
        .bind(feed_id)
        .execute(pool)
        .await?;

        Ok(())
    }
}
