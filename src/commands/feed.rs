use super::CommandContext;
use crate::domain::user::User;
use crate::error::{AppError, AppResult};

pub async fn add(ctx: &CommandContext, current: User, name: &str, url: &str) -> AppResult<()> {
    let feed = ctx.feeds.create(name, url, current.id).await?;
    // The owner follows their own feed implicitly.
    let follow = ctx.follows.create(current.id, feed.id).await?;

    println!("Feed '{}' added and followed by '{}'", follow.feed_name, follow.user_name);
    Ok(())
}

pub async fn list(ctx: &CommandContext) -> AppResult<()> {
    let feeds = ctx.feeds.find_all().await?;

    for feed in feeds {
        let owner = ctx
            .users
            .find_by_id(feed.user_id)
            .await?
            .map(|u| u.name)
            .unwrap_or_else(|| "<unknown>".to_string());
        println!("{}", feed_line(&feed, &owner));
    }

    Ok(())
}

fn feed_line(feed: &crate::domain::feed::Feed, owner: &str) -> String {
    format!("{} ({}), added by {}", feed.name, feed.url, owner)
}

pub async fn follow(ctx: &CommandContext, current: User, url: &str) -> AppResult<()> {
    let feed = ctx
        .feeds
        .find_by_url(url)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Feed with URL '{}'", url)))?;

    let follow = ctx.follows.create(current.id, feed.id).await?;

    println!("'{}' is now following '{}'", follow.user_name, follow.feed_name);
    Ok(())
}

pub async fn following(ctx: &CommandContext, current: User) -> AppResult<()> {
    let names = ctx.follows.feed_names_for_user(current.id).await?;

    for name in names {
        println!("{}", name);
    }

    Ok(())
}

pub async fn unfollow(ctx: &CommandContext, current: User, url: &str) -> AppResult<()> {
    let deleted = ctx.follows.delete_by_url(current.id, url).await?;

    if !deleted {
        return Err(AppError::NotFound(format!(
            "Follow record for URL '{}'",
            url
        )));
    }

    println!("Unfollowed '{}'", url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::feed_line;
    use crate::aggregator::testing::sample_feed;
    use pretty_assertions::assert_eq;

    #[test]
    fn feed_listing_prints_names_without_debug_quoting() {
        let mut feed = sample_feed("https://example.com/rss");
        feed.name = "Example Blog".to_string();

        assert_eq!(
            feed_line(&feed, "alice"),
            "Example Blog (https://example.com/rss), added by alice"
        );
    }
}
