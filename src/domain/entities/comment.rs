use crate::domain::value_objects::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 投稿へのコメント。クライアントからは作成のみで編集はしない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub author_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// リモート確定前に表示する仮コメント
    pub fn provisional(
        post_id: PostId,
        author_id: UserId,
        author_name: String,
        text: String,
    ) -> Self {
        Self {
            id: CommentId::provisional(),
            post_id,
            author_id,
            author_name,
            text,
            created_at: Utc::now(),
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.id.is_provisional()
    }
}
