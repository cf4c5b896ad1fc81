pub mod entities;
pub mod value_objects;

pub use entities::{Comment, Like, Notification, Post, SessionContext, SessionUser};
pub use value_objects::{CommentId, ImageId, LikeId, NotificationId, PostId, UserId};
