use crate::domain::value_objects::{LikeId, PostId, UserId};
use serde::{Deserialize, Serialize};

/// (投稿, ユーザー) ごとに高々 1 件。
/// 一意性は InteractionCoordinator 側で保証する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: LikeId,
    pub post_id: PostId,
    pub user_id: UserId,
}

impl Like {
    pub fn is_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}
