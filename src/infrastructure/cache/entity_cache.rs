use crate::domain::entities::{Comment, Like, Notification, Post};
use crate::domain::value_objects::{CommentId, NotificationId, PostId, UserId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use tracing::debug;

#[derive(Default)]
struct CacheState {
    posts: HashMap<PostId, Post>,
    /// 最初に挿入された順。プロジェクタの「入力順」になる
    post_order: Vec<PostId>,
    comments: HashMap<PostId, Vec<Comment>>,
    likes: HashMap<PostId, Vec<Like>>,
    notifications: HashMap<NotificationId, Notification>,
}

/// セッション単位のエンティティキャッシュ。描画の唯一の情報源。
///
/// 書き込みはすべて ID をキーにした丸ごとの置き換えで、同じ書き込みを
/// 繰り返しても結果は変わらない（ID ごとに後勝ち）。ネットワークには触れない。
pub struct EntityCache {
    state: RwLock<CacheState>,
    revision: watch::Sender<u64>,
}

impl EntityCache {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: RwLock::new(CacheState::default()),
            revision,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// 変更通知。書き込みのたびにリビジョンが進む
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn upsert_post(&self, post: Post) {
        {
            let mut state = self.write();
            insert_post(&mut state, post);
        }
        self.bump();
    }

    pub fn upsert_posts(&self, posts: Vec<Post>) {
        {
            let mut state = self.write();
            for post in posts {
                insert_post(&mut state, post);
            }
        }
        self.bump();
    }

    /// 投稿一覧を丸ごと差し替える。並びは引数の順。
    ///
    /// 含まれない投稿はコメント・いいねごと取り除く。残る投稿の子一覧はそのまま。
    pub fn replace_posts(&self, posts: Vec<Post>) {
        {
            let mut state = self.write();
            let previous = std::mem::take(&mut state.posts);
            state.post_order.clear();
            for post in posts {
                insert_post(&mut state, post);
            }
            let CacheState {
                posts,
                comments,
                likes,
                ..
            } = &mut *state;
            for stale in previous.keys().filter(|id| !posts.contains_key(*id)) {
                debug!("Dropping post {} missing from refreshed feed", stale);
                comments.remove(stale);
                likes.remove(stale);
            }
        }
        self.bump();
    }

    /// 投稿のコメント一覧を丸ごと差し替える。投稿がキャッシュに無ければ何もしない。
    pub fn upsert_comments(&self, post_id: &PostId, comments: Vec<Comment>) -> bool {
        {
            let mut state = self.write();
            if !state.posts.contains_key(post_id) {
                debug!("Ignoring comments for uncached post {}", post_id);
                return false;
            }
            state.comments.insert(post_id.clone(), comments);
        }
        self.bump();
        true
    }

    /// 投稿のいいね一覧を丸ごと差し替える。投稿がキャッシュに無ければ何もしない。
    pub fn upsert_likes(&self, post_id: &PostId, likes: Vec<Like>) -> bool {
        {
            let mut state = self.write();
            if !state.posts.contains_key(post_id) {
                debug!("Ignoring likes for uncached post {}", post_id);
                return false;
            }
            state.likes.insert(post_id.clone(), likes);
        }
        self.bump();
        true
    }

    /// コメントを 1 件追加（同じ ID があれば置き換え）
    pub fn append_comment(&self, comment: Comment) -> bool {
        {
            let mut state = self.write();
            if !state.posts.contains_key(&comment.post_id) {
                debug!("Ignoring comment for uncached post {}", comment.post_id);
                return false;
            }
            let list = state.comments.entry(comment.post_id.clone()).or_default();
            match list.iter_mut().find(|existing| existing.id == comment.id) {
                Some(existing) => *existing = comment,
                None => list.push(comment),
            }
        }
        self.bump();
        true
    }

    pub fn remove_comment(&self, post_id: &PostId, comment_id: &CommentId) -> Option<Comment> {
        let removed = {
            let mut state = self.write();
            let list = state.comments.get_mut(post_id)?;
            let index = list.iter().position(|comment| &comment.id == comment_id)?;
            list.remove(index)
        };
        self.bump();
        Some(removed)
    }

    pub fn upsert_notification(&self, notification: Notification) {
        {
            let mut state = self.write();
            state
                .notifications
                .insert(notification.id.clone(), notification);
        }
        self.bump();
    }

    pub fn upsert_notifications(&self, notifications: Vec<Notification>) {
        {
            let mut state = self.write();
            for notification in notifications {
                state
                    .notifications
                    .insert(notification.id.clone(), notification);
            }
        }
        self.bump();
    }

    /// 投稿と、それに紐づくコメント・いいねを取り除く
    pub fn remove_post(&self, post_id: &PostId) -> Option<Post> {
        let removed = {
            let mut state = self.write();
            let removed = state.posts.remove(post_id)?;
            state.post_order.retain(|id| id != post_id);
            state.comments.remove(post_id);
            state.likes.remove(post_id);
            removed
        };
        self.bump();
        Some(removed)
    }

    pub fn post(&self, post_id: &PostId) -> Option<Post> {
        self.read().posts.get(post_id).cloned()
    }

    /// いいね一覧。まだ取得していない投稿は `None`
    pub fn likes_for(&self, post_id: &PostId) -> Option<Vec<Like>> {
        self.read().likes.get(post_id).cloned()
    }

    pub fn comments_for(&self, post_id: &PostId) -> Vec<Comment> {
        self.read()
            .comments
            .get(post_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn notification(&self, notification_id: &NotificationId) -> Option<Notification> {
        self.read().notifications.get(notification_id).cloned()
    }

    /// ユーザー宛ての通知（新しい順）
    pub fn notifications_for(&self, user_id: &UserId) -> Vec<Notification> {
        let mut items: Vec<Notification> = self
            .read()
            .notifications
            .values()
            .filter(|notification| notification.is_for(user_id))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        items
    }

    pub fn unread_count(&self, user_id: &UserId) -> usize {
        self.read()
            .notifications
            .values()
            .filter(|notification| notification.is_for(user_id) && !notification.read)
            .count()
    }

    /// プロジェクタ用の不変スナップショット
    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.read();
        let posts = state
            .post_order
            .iter()
            .filter_map(|id| state.posts.get(id).cloned())
            .collect();
        let comment_counts = state
            .comments
            .iter()
            .map(|(id, comments)| (id.clone(), comments.len()))
            .collect();
        FeedSnapshot {
            posts,
            likes: state.likes.clone(),
            comment_counts,
        }
    }

    pub fn size(&self) -> usize {
        self.read().posts.len()
    }

    pub fn clear(&self) {
        {
            let mut state = self.write();
            *state = CacheState::default();
        }
        self.bump();
    }
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_post(state: &mut CacheState, post: Post) {
    if !state.posts.contains_key(&post.id) {
        state.post_order.push(post.id.clone());
    }
    state.posts.insert(post.id.clone(), post);
}

/// ある時点のキャッシュ内容。投稿は挿入順に並ぶ。
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub posts: Vec<Post>,
    pub likes: HashMap<PostId, Vec<Like>>,
    pub comment_counts: HashMap<PostId, usize>,
}

impl FeedSnapshot {
    pub fn like_count(&self, post_id: &PostId) -> usize {
        self.likes.get(post_id).map_or(0, Vec::len)
    }

    pub fn comment_count(&self, post_id: &PostId) -> usize {
        self.comment_counts.get(post_id).copied().unwrap_or(0)
    }

    pub fn liked_by(&self, post_id: &PostId, user_id: &UserId) -> bool {
        self.likes
            .get(post_id)
            .is_some_and(|likes| likes.iter().any(|like| like.is_by(user_id)))
    }
}
