pub mod cache;

pub use cache::{EntityCache, FeedSnapshot};
