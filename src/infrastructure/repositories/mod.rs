pub mod feed_follow_repository;
pub mod feed_repository;
pub mod post_repository;
pub mod user_repository;

pub use feed_follow_repository::FeedFollowRepository;
pub use feed_repository::FeedRepository;
pub use post_repository::PostRepository;
pub use user_repository::UserRepository;
