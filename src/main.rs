use clap::Parser;
use feedloop::commands::{self, Cli, CommandContext};
use feedloop::infrastructure::config::{Config, LogFormat};
use feedloop::infrastructure::db::connect;
use feedloop::infrastructure::repositories::{
    FeedFollowRepository, FeedRepository, PostRepository, UserRepository,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;

    let pool = connect(&config.db_url).await?;
    sqlx::migrate!().run(&pool).await?;
    tracing::debug!("Database connection verified");

    let pool = Arc::new(pool);
    let ctx = CommandContext {
        config,
        users: Arc::new(UserRepository::new(pool.clone())),
        feeds: Arc::new(FeedRepository::new(pool.clone())),
        follows: Arc::new(FeedFollowRepository::new(pool.clone())),
        posts: Arc::new(PostRepository::new(pool.clone())),
    };

    commands::dispatch(ctx, cli.command).await?;
    Ok(())
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "feedloop=info".into());

    if Config::log_format() == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}
