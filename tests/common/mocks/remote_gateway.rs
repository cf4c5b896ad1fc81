use async_trait::async_trait;
use mockall::mock;
use vibez_lib::application::ports::{GatewayError, NotificationSubscription, RemoteDataGateway};
use vibez_lib::domain::entities::{Comment, Like, NewNotification, Notification, Post};
use vibez_lib::domain::value_objects::{ImageId, LikeId, NotificationId, PostId, UserId};

mock! {
    pub RemoteGateway {}

    #[async_trait]
    impl RemoteDataGateway for RemoteGateway {
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
}
