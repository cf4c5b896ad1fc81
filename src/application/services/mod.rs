pub mod feed_loader;
pub mod feed_view_projector;
pub mod interaction_coordinator;
pub mod notification_stream;
pub mod saved_set_tracker;

pub use feed_loader::{FeedLoadReport, FeedLoader};
pub use feed_view_projector::{FeedItem, FeedViewProjector};
pub use interaction_coordinator::{InteractionCoordinator, LikeToggleOutcome};
pub use notification_stream::{NotificationStream, SubscriptionStatus};
pub use saved_set_tracker::{SavedSet, SavedSetTracker};
