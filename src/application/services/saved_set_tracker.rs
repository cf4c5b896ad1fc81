use crate::domain::value_objects::PostId;
use std::collections::HashSet;
use tracing::debug;

/// 保存済み投稿の集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedSet(HashSet<PostId>);

impl SavedSet {
    pub fn contains(&self, post_id: &PostId) -> bool {
        self.0.contains(post_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PostId> for SavedSet {
    fn from_iter<I: IntoIterator<Item = PostId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// ユーザーが「保存」した投稿をセッション中だけ覚えておく。
#[derive(Debug, Default)]
pub struct SavedSetTracker {
    saved: SavedSet,
}

impl SavedSetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存状態を反転し、反転後に保存されているかを返す
    pub fn toggle(&mut self, post_id: &PostId) -> bool {
        let saved = if self.saved.0.remove(post_id) {
            false
        } else {
            self.saved.0.insert(post_id.clone());
            true
        };
        debug!("Post {} saved={}", post_id, saved);
        saved
    }

    pub fn is_saved(&self, post_id: &PostId) -> bool {
        self.saved.contains(post_id)
    }

    pub fn saved(&self) -> &SavedSet {
        &self.saved
    }

    pub fn clear(&mut self) {
        self.saved.0.clear();
    }
}
