use crate::domain::value_objects::{ImageId, NotificationId, PostId};
use thiserror::Error;

/// フィードエンジンが UI 層へ返すエラー分類。
///
/// RemoteDataGateway の生エラーはすべてこの分類へ変換してから返す。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("Sign in to continue")]
    Unauthenticated,

    #[error("Could not update the like on post {post_id}: {reason}")]
    LikeActionFailed { post_id: PostId, reason: String },

    #[error("Could not post your comment on {post_id}: {reason}")]
    CommentActionFailed { post_id: PostId, reason: String },

    #[error(
        "Post {post_id} was deleted but its image {image_id} could not be removed: {reason}"
    )]
    PartialDeleteFailure {
        post_id: PostId,
        image_id: ImageId,
        reason: String,
    },

    #[error("Another like/unlike on post {post_id} is still in progress")]
    ActionInProgress { post_id: PostId },

    #[error("Live notifications were interrupted: {reason}")]
    SubscriptionInterrupted { reason: String },

    #[error("Comment text must not be empty")]
    EmptyComment,

    #[error("Comment exceeds {max} characters")]
    CommentTooLong { max: usize },

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Only the author can delete post {post_id}")]
    NotPostAuthor { post_id: PostId },

    #[error("Could not delete post {post_id}: {reason}")]
    DeleteFailed { post_id: PostId, reason: String },

    #[error("Could not mark notification {notification_id} as read: {reason}")]
    MarkReadFailed {
        notification_id: NotificationId,
        reason: String,
    },

    #[error("Notification not found: {0}")]
    NotificationNotFound(NotificationId),

    #[error("Failed to load feed data: {reason}")]
    LoadFailed { reason: String },

    #[error("Rejected notification event: {0}")]
    InvalidEvent(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FeedError {
    /// UI 側で種別を判定するための安定したコード。
    pub fn code(&self) -> &'static str {
        match self {
            FeedError::Unauthenticated => "unauthenticated",
            FeedError::LikeActionFailed { .. } => "like_action_failed",
            FeedError::CommentActionFailed { .. } => "comment_action_failed",
            FeedError::PartialDeleteFailure { .. } => "partial_delete_failure",
            FeedError::ActionInProgress { .. } => "action_in_progress",
            FeedError::SubscriptionInterrupted { .. } => "subscription_interrupted",
            FeedError::EmptyComment => "empty_comment",
            FeedError::CommentTooLong { .. } => "comment_too_long",
            FeedError::PostNotFound(_) => "post_not_found",
            FeedError::NotPostAuthor { .. } => "not_post_author",
            FeedError::DeleteFailed { .. } => "delete_failed",
            FeedError::MarkReadFailed { .. } => "mark_read_failed",
            FeedError::NotificationNotFound(_) => "notification_not_found",
            FeedError::LoadFailed { .. } => "load_failed",
            FeedError::InvalidEvent(_) => "invalid_event",
            FeedError::Configuration(_) => "configuration",
        }
    }

    /// サインイン画面への誘導が必要かどうか
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, FeedError::Unauthenticated)
    }

    /// 同じ操作を再試行して意味があるかどうか
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FeedError::LikeActionFailed { .. }
                | FeedError::CommentActionFailed { .. }
                | FeedError::ActionInProgress { .. }
                | FeedError::SubscriptionInterrupted { .. }
                | FeedError::DeleteFailed { .. }
                | FeedError::MarkReadFailed { .. }
                | FeedError::LoadFailed { .. }
        )
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::InvalidEvent(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
