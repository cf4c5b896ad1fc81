use crate::domain::value_objects::PostId;
use crate::shared::config::ToggleDiscipline;
use crate::shared::error::FeedError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 投稿ごとの処理中ガード。共有メモリのロックではなく、
/// 同一投稿へのいいね操作を直列化するための論理的な印。
#[derive(Default)]
pub(crate) struct InFlightRegistry {
    slots: Mutex<HashMap<PostId, Arc<AsyncMutex<()>>>>,
}

pub(crate) type InFlightGuard = OwnedMutexGuard<()>;

impl InFlightRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn slot(&self, post_id: &PostId) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(post_id.clone()).or_default())
    }

    /// ガードを取得する。`Reject` は処理中なら即エラー、`Queue` は完了を待つ。
    pub(crate) async fn acquire(
        &self,
        post_id: &PostId,
        discipline: ToggleDiscipline,
    ) -> Result<InFlightGuard, FeedError> {
        let slot = self.slot(post_id);
        match discipline {
            ToggleDiscipline::Reject => {
                slot.try_lock_owned()
                    .map_err(|_| FeedError::ActionInProgress {
                        post_id: post_id.clone(),
                    })
            }
            ToggleDiscipline::Queue => Ok(slot.lock_owned().await),
        }
    }

    pub(crate) fn is_in_flight(&self, post_id: &PostId) -> bool {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .get(post_id)
            .is_some_and(|slot| slot.try_lock().is_err())
    }

    /// 削除済み投稿のスロットを片付ける
    pub(crate) fn forget(&self, post_id: &PostId) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(post_id);
    }
}
