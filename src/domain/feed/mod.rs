pub mod model;

pub use model::{Feed, FeedFollow, FollowSummary};
