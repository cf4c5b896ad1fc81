use crate::domain::entities::{Comment, Like, NewNotification, Notification, Post};
use crate::domain::value_objects::{ImageId, LikeId, NotificationId, PostId, UserId};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// リモートストアの生エラー。エンジンの境界で FeedError に変換される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// 通知プッシュチャネルの購読ハンドル。
///
/// 受信側が `None` を返したら切断。ハンドルを drop すると購読解除になる。
#[derive(Debug)]
pub struct NotificationSubscription {
    frames: mpsc::Receiver<serde_json::Value>,
}

impl NotificationSubscription {
    pub fn new(frames: mpsc::Receiver<serde_json::Value>) -> Self {
        Self { frames }
    }

    /// 次のイベントフレーム（未検証の JSON）
    pub async fn recv(&mut self) -> Option<serde_json::Value> {
        self.frames.recv().await
    }
}

/// 投稿・コメント・いいね・通知の CRUD と、通知の変更ストリームを提供する外部コラボレーター
#[async_trait]
pub trait RemoteDataGateway: Send + Sync {
    async fn fetch_active_posts(&self) -> Result<Vec<Post>, GatewayError>;
    async fn fetch_comments(&self, post_id: &PostId) -> Result<Vec<Comment>, GatewayError>;
    async fn fetch_likes(&self, post_id: &PostId) -> Result<Vec<Like>, GatewayError>;
    async fn create_like(&self, post_id: &PostId, user_id: &UserId) -> Result<Like, GatewayError>;
    async fn delete_like(&self, like_id: &LikeId) -> Result<(), GatewayError>;
    async fn create_comment(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        display_name: &str,
        text: &str,
    ) -> Result<Comment, GatewayError>;
    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, GatewayError>;
    /// 新しい順、最大 `limit` 件
    async fn fetch_notifications(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Notification>, GatewayError>;
    async fn mark_notification_read(
        &self,
        notification_id: &NotificationId,
    ) -> Result<(), GatewayError>;
    async fn delete_post(&self, post_id: &PostId) -> Result<(), GatewayError>;
    async fn delete_image(&self, image_id: &ImageId) -> Result<(), GatewayError>;
    async fn subscribe_notification_events(
        &self,
        user_id: &UserId,
    ) -> Result<NotificationSubscription, GatewayError>;
}
