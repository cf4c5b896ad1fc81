use crate::domain::value_objects::{CommentId, NotificationId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Like,
    Comment,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 投稿者宛ての通知。クライアントが変更するのは既読フラグだけ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub kind: NotificationKind,
    pub message: String,
    pub post_id: PostId,
    #[serde(default)]
    pub comment_id: Option<CommentId>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_for(&self, user_id: &UserId) -> bool {
        &self.recipient_id == user_id
    }

    pub fn mark_read(mut self) -> Self {
        self.read = true;
        self
    }

    pub fn target(&self) -> NotificationTarget {
        NotificationTarget {
            post_id: self.post_id.clone(),
            comment_id: self.comment_id.clone(),
            kind: self.kind,
        }
    }
}

/// 通知作成リクエスト。ID と作成時刻はリモート側で採番される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub recipient_id: UserId,
    pub kind: NotificationKind,
    pub message: String,
    pub post_id: PostId,
    pub comment_id: Option<CommentId>,
}

impl NewNotification {
    pub fn like(recipient_id: UserId, actor_name: &str, post_title: &str, post_id: PostId) -> Self {
        Self {
            recipient_id,
            kind: NotificationKind::Like,
            message: format!("{actor_name} liked your post \"{post_title}\""),
            post_id,
            comment_id: None,
        }
    }

    pub fn comment(
        recipient_id: UserId,
        actor_name: &str,
        post_title: &str,
        post_id: PostId,
        comment_id: CommentId,
    ) -> Self {
        Self {
            recipient_id,
            kind: NotificationKind::Comment,
            message: format!("{actor_name} commented on your post \"{post_title}\""),
            post_id,
            comment_id: Some(comment_id),
        }
    }
}

/// 通知を開いたときに UI がスクロール・強調表示する対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTarget {
    pub post_id: PostId,
    pub comment_id: Option<CommentId>,
    pub kind: NotificationKind,
}

/// プッシュチャネルで届く通知イベント。
///
/// `{"type": "created" | "updated", "notification": {...}}` 以外の形は受け付けない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "notification", rename_all = "snake_case")]
pub enum NotificationEvent {
    Created(Notification),
    Updated(Notification),
}

impl NotificationEvent {
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn notification(&self) -> &Notification {
        match self {
            NotificationEvent::Created(n) | NotificationEvent::Updated(n) => n,
        }
    }
}
