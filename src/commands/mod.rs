pub mod agg;
pub mod feed;
pub mod post;
pub mod user;

use crate::domain::user::User;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::{
    FeedFollowRepository, FeedRepository, PostRepository, UserRepository,
};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "feedloop", about = "Multi-user RSS aggregator", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new user and log in as them
    Register { name: String },
    /// Switch the current user to an existing one
    Login { name: String },
    /// List all registered users
    Users,
    /// Delete all users, feeds, follows and posts
    Reset,
    /// Run the polling loop, fetching the most-stale feed once per interval
    Agg {
        /// Time between fetches, e.g. "30s", "1m", "24h"
        #[arg(value_parser = humantime::parse_duration)]
        interval: Duration,
    },
    /// Register a feed owned by the current user and follow it
    Addfeed { name: String, url: String },
    /// List all feeds with their owners
    Feeds,
    /// Follow an existing feed by URL
    Follow { url: String },
    /// List the feeds the current user follows
    Following,
    /// Stop following a feed by URL
    Unfollow { url: String },
    /// Show the newest posts from followed feeds
    Browse {
        #[arg(default_value_t = 2)]
        limit: i64,
    },
}

/// Everything a command handler may need, built once at startup.
pub struct CommandContext {
    pub config: Config,
    pub users: Arc<UserRepository>,
    pub feeds: Arc<FeedRepository>,
    pub follows: Arc<FeedFollowRepository>,
    pub posts: Arc<PostRepository>,
}

/// Explicit dispatch table. Commands that act on behalf of a user get
/// the authenticated user resolved once, here, and passed by value.
pub async fn dispatch(mut ctx: CommandContext, command: Command) -> AppResult<()> {
    match command {
        Command::Register { name } => user::register(&mut ctx, &name).await,
        Command::Login { name } => user::login(&mut ctx, &name).await,
        Command::Users => user::list(&ctx).await,
        Command::Reset => user::reset(&ctx).await,
        Command::Agg { interval } => agg::run(&ctx, interval).await,
        Command::Feeds => feed::list(&ctx).await,
        Command::Addfeed { name, url } => {
            let current = current_user(&ctx).await?;
            feed::add(&ctx, current, &name, &url).await
        }
        Command::Follow { url } => {
            let current = current_user(&ctx).await?;
            feed::follow(&ctx, current, &url).await
        }
        Command::Following => {
            let current = current_user(&ctx).await?;
            feed::following(&ctx, current).await
        }
        Command::Unfollow { url } => {
            let current = current_user(&ctx).await?;
            feed::unfollow(&ctx, current, &url).await
        }
        Command::Browse { limit } => {
            let current = current_user(&ctx).await?;
            post::browse(&ctx, current, limit).await
        }
    }
}

/// Resolve the logged-in user from the config file.
async fn current_user(ctx: &CommandContext) -> AppResult<User> {
    let name = ctx
        .config
        .current_user_name
        .as_deref()
        .ok_or_else(|| AppError::Usage("Not logged in; use 'register' or 'login' first".into()))?;

    ctx.users
        .find_by_name(name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{}'", name)))
}
