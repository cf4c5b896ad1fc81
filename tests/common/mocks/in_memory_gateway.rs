use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio::sync::{mpsc, watch, Notify};
use vibez_lib::application::ports::{GatewayError, NotificationSubscription, RemoteDataGateway};
use vibez_lib::domain::entities::{Comment, Like, NewNotification, Notification, Post};
use vibez_lib::domain::value_objects::{
    CommentId, ImageId, LikeId, NotificationId, PostId, UserId,
};

#[derive(Default)]
struct GatewayState {
    posts: Vec<Post>,
    comments: HashMap<PostId, Vec<Comment>>,
    likes: HashMap<PostId, Vec<Like>>,
    notifications: Vec<Notification>,
    deleted_images: Vec<ImageId>,
    calls: Vec<&'static str>,
    failing: HashSet<&'static str>,
    failing_subscribes: u32,
    subscriptions: usize,
    push: Option<mpsc::Sender<serde_json::Value>>,
    next_id: u64,
}

/// 呼び出しを記録するインメモリのリモートストア。操作名単位で失敗を注入できる。
pub struct InMemoryGateway {
    state: Mutex<GatewayState>,
    writes_paused: watch::Sender<bool>,
    write_started: Notify,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    pub fn new() -> Self {
        let (writes_paused, _) = watch::channel(false);
        Self {
            state: Mutex::new(GatewayState::default()),
            writes_paused,
            write_started: Notify::new(),
        }
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        let gateway = Self::new();
        gateway.state.lock().unwrap().posts = posts;
        gateway
    }

    pub fn seed_like(&self, post_id: &PostId, user_id: &UserId) -> Like {
        let mut state = self.state.lock().unwrap();
        let like = Like {
            id: LikeId::new(next_id(&mut state, "like")).unwrap(),
            post_id: post_id.clone(),
            user_id: user_id.clone(),
        };
        state.likes.entry(post_id.clone()).or_default().push(like.clone());
        like
    }

    pub fn seed_notification(&self, notification: Notification) {
        self.state.lock().unwrap().notifications.push(notification);
    }

    /// 指定した操作を失敗させる
    pub fn fail(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.remove(operation);
    }

    /// 次の `count` 回の購読を失敗させる
    pub fn fail_subscribes(&self, count: u32) {
        self.state.lock().unwrap().failing_subscribes = count;
    }

    /// いいね・コメントの書き込みを `resume_writes` まで止める
    pub fn pause_writes(&self) {
        self.writes_paused.send_replace(true);
    }

    pub fn resume_writes(&self) {
        self.writes_paused.send_replace(false);
    }

    /// 書き込みがゲートに到達するまで待つ
    pub async fn wait_for_write(&self) {
        self.write_started.notified().await;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    pub fn likes(&self, post_id: &PostId) -> Vec<Like> {
        self.state
            .lock()
            .unwrap()
            .likes
            .get(post_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn comments(&self, post_id: &PostId) -> Vec<Comment> {
        self.state
            .lock()
            .unwrap()
            .comments
            .get(post_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.state.lock().unwrap().posts.clone()
    }

    pub fn deleted_images(&self) -> Vec<ImageId> {
        self.state.lock().unwrap().deleted_images.clone()
    }

    pub fn subscriptions(&self) -> usize {
        self.state.lock().unwrap().subscriptions
    }

    /// 購読中のチャネルへフレームを流す。購読者がいなければ `false`
    pub async fn push(&self, frame: serde_json::Value) -> bool {
        let sender = self.state.lock().unwrap().push.clone();
        match sender {
            Some(sender) => sender.send(frame).await.is_ok(),
            None => false,
        }
    }

    /// プッシュチャネルを切断する
    pub fn disconnect(&self) {
        self.state.lock().unwrap().push = None;
    }

    fn record(&self, operation: &'static str) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation);
        if state.failing.contains(operation) {
            return Err(GatewayError::Transport(format!("{operation} unavailable")));
        }
        Ok(())
    }

    async fn write_gate(&self) {
        self.write_started.notify_one();
        let mut paused = self.writes_paused.subscribe();
        let _ = paused.wait_for(|paused| !*paused).await;
    }
}

fn next_id(state: &mut GatewayState, prefix: &str) -> String {
    state.next_id += 1;
    format!("{prefix}-{}", state.next_id)
}

#[async_trait]
impl RemoteDataGateway for InMemoryGateway {
    async fn fetch_active_posts(&self) -> Result<Vec<Post>, GatewayError> {
        self.record("fetch_active_posts")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .posts
            .iter()
            .filter(|post| post.is_active())
            .cloned()
            .collect())
    }

    async fn fetch_comments(&self, post_id: &PostId) -> Result<Vec<Comment>, GatewayError> {
        self.record("fetch_comments")?;
        Ok(self.comments(post_id))
    }

    async fn fetch_likes(&self, post_id: &PostId) -> Result<Vec<Like>, GatewayError> {
        self.record("fetch_likes")?;
        Ok(self.likes(post_id))
    }

    async fn create_like(&self, post_id: &PostId, user_id: &UserId) -> Result<Like, GatewayError> {
        self.record("create_like")?;
        self.write_gate().await;
        Ok(self.seed_like(post_id, user_id))
    }

    async fn delete_like(&self, like_id: &LikeId) -> Result<(), GatewayError> {
        self.record("delete_like")?;
        self.write_gate().await;
        let mut state = self.state.lock().unwrap();
        let mut found = false;
        for likes in state.likes.values_mut() {
            let before = likes.len();
            likes.retain(|like| &like.id != like_id);
            found |= likes.len() != before;
        }
        if found {
            Ok(())
        } else {
            Err(GatewayError::NotFound(like_id.to_string()))
        }
    }

    async fn create_comment(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        display_name: &str,
        text: &str,
    ) -> Result<Comment, GatewayError> {
        self.record("create_comment")?;
        self.write_gate().await;
        let mut state = self.state.lock().unwrap();
        let comment = Comment {
            id: CommentId::new(next_id(&mut state, "comment")).unwrap(),
            post_id: post_id.clone(),
            author_id: user_id.clone(),
            author_name: display_name.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        state
            .comments
            .entry(post_id.clone())
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, GatewayError> {
        self.record("create_notification")?;
        let mut state = self.state.lock().unwrap();
        let created = Notification {
            id: NotificationId::new(next_id(&mut state, "notification")).unwrap(),
            recipient_id: notification.recipient_id,
            kind: notification.kind,
            message: notification.message,
            post_id: notification.post_id,
            comment_id: notification.comment_id,
            read: false,
            created_at: Utc::now(),
        };
        state.notifications.push(created.clone());
        Ok(created)
    }

    async fn fetch_notifications(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Notification>, GatewayError> {
        self.record("fetch_notifications")?;
        let mut items: Vec<Notification> = self
            .notifications()
            .into_iter()
            .filter(|notification| notification.is_for(user_id))
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit);
        Ok(items)
    }

    async fn mark_notification_read(
        &self,
        notification_id: &NotificationId,
    ) -> Result<(), GatewayError> {
        self.record("mark_notification_read")?;
        let mut state = self.state.lock().unwrap();
        match state
            .notifications
            .iter_mut()
            .find(|notification| &notification.id == notification_id)
        {
            Some(notification) => {
                notification.read = true;
                Ok(())
            }
            None => Err(GatewayError::NotFound(notification_id.to_string())),
        }
    }

    async fn delete_post(&self, post_id: &PostId) -> Result<(), GatewayError> {
        self.record("delete_post")?;
        let mut state = self.state.lock().unwrap();
        let before = state.posts.len();
        state.posts.retain(|post| &post.id != post_id);
        if state.posts.len() == before {
            return Err(GatewayError::NotFound(post_id.to_string()));
        }
        state.comments.remove(post_id);
        state.likes.remove(post_id);
        Ok(())
    }

    async fn delete_image(&self, image_id: &ImageId) -> Result<(), GatewayError> {
        self.record("delete_image")?;
        self.state
            .lock()
            .unwrap()
            .deleted_images
            .push(image_id.clone());
        Ok(())
    }

    async fn subscribe_notification_events(
        &self,
        _user_id: &UserId,
    ) -> Result<NotificationSubscription, GatewayError> {
        self.record("subscribe_notification_events")?;
        let mut state = self.state.lock().unwrap();
        if state.failing_subscribes > 0 {
            state.failing_subscribes -= 1;
            return Err(GatewayError::Transport("push channel unavailable".into()));
        }
        let (sender, receiver) = mpsc::channel(16);
        state.push = Some(sender);
        state.subscriptions += 1;
        Ok(NotificationSubscription::new(receiver))
    }
}
