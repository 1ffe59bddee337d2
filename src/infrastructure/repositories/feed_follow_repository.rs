use crate::infrastructure::db::DbPool;
use crate::{
    domain::feed::FollowSummary,
    error::{AppError, AppResult},
};
use std::sync::Arc;
use uuid::Uuid;

pub struct FeedFollowRepository {
    pool: Arc<DbPool>,
}

impl FeedFollowRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Create a follow record and return the joined feed and user names.
    pub async fn create(&self, user_id: Uuid, feed_id: Uuid) -> AppResult<FollowSummary> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let summary = sqlx::query_as::<_, FollowSummary>(
            r#"
            WITH inserted_follow AS (
                INSERT INTO feed_follows (id, created_at, updated_at, user_id, feed_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING user_id, feed_id
            )
            SELECT feeds.name AS feed_name, users.name AS user_name
            FROM inserted_follow
            INNER JOIN feeds ON feeds.id = inserted_follow.feed_id
            INNER JOIN users ON users.id = inserted_follow.user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(now)
        .bind(user_id)
        .bind(feed_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Already following this feed".to_string());
                }
            }
            AppError::Database(e)
        })?;

        Ok(summary)
    }

    /// Names of all feeds a user follows
    pub async fn feed_names_for_user(&self, user_id: Uuid) -> AppResult<Vec<String>> {
        let pool = self.pool.as_ref();
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT feeds.name
            FROM feed_follows
            INNER JOIN feeds ON feeds.id = feed_follows.feed_id
            WHERE feed_follows.user_id = $1
            ORDER BY feed_follows.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(names)
    }

    /// Delete a follow by user and feed URL; returns whether a row existed.
    pub async fn delete_by_url(&self, user_id: Uuid, url: &str) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            DELETE FROM feed_follows USING feeds
            WHERE feed_follows.feed_id = feeds.id
              AND feed_follows.user_id = $1
              AND feeds.url = $2
            "#,
        )
        .bind(user_id)
        .bind(url)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
