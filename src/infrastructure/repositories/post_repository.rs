use crate::infrastructure::db::DbPool;
use crate::{
    domain::post::{NewPost, Post},
    error::{AppError, AppResult},
};
use std::sync::Arc;
use uuid::Uuid;

/// Name of the unique constraint on posts.url. Only violations of this
/// constraint count as expected duplicates; any other unique violation
/// stays a database error.
const POST_URL_CONSTRAINT: &str = "posts_url_key";

pub struct PostRepository {
    pool: Arc<DbPool>,
}

impl PostRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Insert a post. The insert is optimistic: the unique constraint on
    /// the link closes the race between concurrent ingesters, so there is
    /// no check-then-insert step.
    pub async fn create(&self, post: &NewPost) -> AppResult<Post> {
        let pool = self.pool.as_ref();

        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, created_at, updated_at, title, url, description, published_at, feed_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(post.id)
        .bind(post.created_at)
        .bind(post.updated_at)
        .bind(&post.title)
        .bind(&post.url)
        .bind(&post.description)
        .bind(post.published_at)
        .bind(post.feed_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() && db_err.constraint() == Some(POST_URL_CONSTRAINT)
                {
                    return AppError::DuplicatePost(post.url.clone());
                }
            }
            AppError::Database(e)
        })?;

        Ok(created)
    }

    /// Newest posts from the feeds a user follows
    pub async fn find_for_user(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Post>> {
        let pool = self.pool.as_ref();
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT posts.*
            FROM posts
            INNER JOIN feed_follows ON feed_follows.feed_id = posts.feed_id
            WHERE feed_follows.user_id = $1
            ORDER BY posts.published_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }
}
