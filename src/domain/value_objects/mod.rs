pub mod entity_id;
pub mod feed_view;

pub use entity_id::{CommentId, ImageId, LikeId, NotificationId, PostId, UserId};
pub use feed_view::{FeedTab, FeedViewState};
