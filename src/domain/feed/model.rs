use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A remote content source, owned by the user who first registered it.
/// `last_fetched_at` is the freshness watermark used by the poll
/// scheduler; never fetched sorts before any fetched feed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feed {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub url: String,
    pub user_id: Uuid,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

/// A user's subscription to a feed, independent of who registered it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedFollow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub feed_id: Uuid,
}

/// Follow row joined with the feed and user names, for CLI output.
#[derive(Debug, Clone, FromRow)]
pub struct FollowSummary {
    pub feed_name: String,
    pub user_name: String,
}
