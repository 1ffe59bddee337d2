use super::CommandContext;
use crate::domain::user::User;
use crate::error::AppResult;

pub async fn browse(ctx: &CommandContext, current: User, limit: i64) -> AppResult<()> {
    let posts = ctx.posts.find_for_user(current.id, limit).await?;

    if posts.is_empty() {
        println!("No posts yet; follow some feeds and run 'agg'");
        return Ok(());
    }

    for post in posts {
        println!("{} ({})", post.title, post.published_at.to_rfc2822());
        println!("  {}", post.url);
        if !post.description.is_empty() {
            println!("  {}", post.description);
        }
    }

    Ok(())
}
