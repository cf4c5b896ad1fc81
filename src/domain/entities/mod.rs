pub mod comment;
pub mod like;
pub mod notification;
pub mod post;
pub mod session;

pub use comment::Comment;
pub use like::Like;
pub use notification::{
    NewNotification, Notification, NotificationEvent, NotificationKind, NotificationTarget,
};
pub use post::{Post, PostStatus};
pub use session::{SessionContext, SessionUser};
