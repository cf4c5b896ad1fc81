use crate::application::ports::remote_gateway::{NotificationSubscription, RemoteDataGateway};
use crate::domain::entities::{
    Notification, NotificationEvent, NotificationTarget, SessionContext,
};
use crate::domain::value_objects::{NotificationId, UserId};
use crate::infrastructure::cache::EntityCache;
use crate::shared::config::NotificationConfig;
use crate::shared::error::FeedError;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Pending,
    Subscribed,
    NeedsResync,
    Stopped,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Subscribed => "subscribed",
            SubscriptionStatus::NeedsResync => "needs_resync",
            SubscriptionStatus::Stopped => "stopped",
        }
    }
}

/// ログインユーザー宛ての通知をキャッシュへ取り込み続ける。
///
/// 通知は ID をキーに upsert するだけなので、同じイベントが重複して届いても
/// 結果は変わらない。切断後は再購読してから全件を取り直し、取りこぼしを埋める。
pub struct NotificationStream {
    gateway: Arc<dyn RemoteDataGateway>,
    cache: Arc<EntityCache>,
    config: NotificationConfig,
    status: watch::Sender<SubscriptionStatus>,
}

impl NotificationStream {
    pub fn new(
        gateway: Arc<dyn RemoteDataGateway>,
        cache: Arc<EntityCache>,
        config: NotificationConfig,
    ) -> Self {
        let (status, _) = watch::channel(SubscriptionStatus::Stopped);
        Self {
            gateway,
            cache,
            config,
            status,
        }
    }

    pub fn status(&self) -> SubscriptionStatus {
        *self.status.borrow()
    }

    pub fn watch_status(&self) -> watch::Receiver<SubscriptionStatus> {
        self.status.subscribe()
    }

    fn set_status(&self, status: SubscriptionStatus) {
        self.status.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            debug!(
                "Notification subscription {} -> {}",
                current.as_str(),
                status.as_str()
            );
            *current = status;
            true
        });
    }

    /// 最新の通知を 1 ページ取得してキャッシュへ反映する
    pub async fn load(&self, session: &SessionContext) -> Result<Vec<Notification>, FeedError> {
        let user = session.require_user()?;
        let page = self
            .gateway
            .fetch_notifications(&user.id, self.config.page_size)
            .await
            .map_err(|err| {
                warn!("Failed to fetch notifications for {}: {}", user.id, err);
                FeedError::LoadFailed {
                    reason: err.to_string(),
                }
            })?;

        let (mine, foreign): (Vec<_>, Vec<_>) =
            page.into_iter().partition(|notification| notification.is_for(&user.id));
        if !foreign.is_empty() {
            warn!(
                "Discarding {} notifications addressed to other users",
                foreign.len()
            );
        }
        self.cache.upsert_notifications(mine);
        Ok(self.cache.notifications_for(&user.id))
    }

    /// 検証済みイベントを反映する。他ユーザー宛てなら捨てて `false` を返す。
    pub fn apply_event(&self, session: &SessionContext, event: NotificationEvent) -> bool {
        let Some(user_id) = session.user_id() else {
            debug!("Dropping notification event without a signed-in user");
            return false;
        };
        if !event.notification().is_for(user_id) {
            debug!(
                "Dropping notification {} for another user",
                event.notification().id
            );
            return false;
        }

        let notification = match event {
            NotificationEvent::Created(notification) => {
                // 再送された created で既読が未読に戻らないようにする
                match self.cache.notification(&notification.id) {
                    Some(existing) if existing.read => notification.mark_read(),
                    _ => notification,
                }
            }
            NotificationEvent::Updated(notification) => notification,
        };
        self.cache.upsert_notification(notification);
        true
    }

    /// プッシュチャネルの生フレームを検証して反映する
    pub fn handle_frame(
        &self,
        session: &SessionContext,
        frame: serde_json::Value,
    ) -> Result<bool, FeedError> {
        let event = NotificationEvent::from_value(frame).map_err(|err| {
            warn!("Rejected notification frame: {}", err);
            FeedError::from(err)
        })?;
        Ok(self.apply_event(session, event))
    }

    pub fn notifications(&self, session: &SessionContext) -> Vec<Notification> {
        session
            .user_id()
            .map(|user_id| self.cache.notifications_for(user_id))
            .unwrap_or_default()
    }

    pub fn unread_count(&self, session: &SessionContext) -> usize {
        session
            .user_id()
            .map_or(0, |user_id| self.cache.unread_count(user_id))
    }

    /// 既読にする。リモート更新が成功したときだけキャッシュを書き換える。
    pub async fn mark_read(
        &self,
        session: &SessionContext,
        notification_id: &NotificationId,
    ) -> Result<Notification, FeedError> {
        let user = session.require_user()?;
        let notification = self.owned_notification(&user.id, notification_id)?;
        if notification.read {
            return Ok(notification);
        }

        self.gateway
            .mark_notification_read(notification_id)
            .await
            .map_err(|err| {
                warn!("Failed to mark notification {} read: {}", notification_id, err);
                FeedError::MarkReadFailed {
                    notification_id: notification_id.clone(),
                    reason: err.to_string(),
                }
            })?;

        let updated = notification.mark_read();
        self.cache.upsert_notification(updated.clone());
        Ok(updated)
    }

    /// 通知を開く。未読なら既読にしてから遷移先を返す。
    pub async fn open_notification(
        &self,
        session: &SessionContext,
        notification_id: &NotificationId,
    ) -> Result<NotificationTarget, FeedError> {
        let notification = self.mark_read(session, notification_id).await?;
        Ok(notification.target())
    }

    fn owned_notification(
        &self,
        user_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<Notification, FeedError> {
        self.cache
            .notification(notification_id)
            .filter(|notification| notification.is_for(user_id))
            .ok_or_else(|| FeedError::NotificationNotFound(notification_id.clone()))
    }

    /// プッシュチャネルを購読し続ける。キャンセルされたら `Ok(())`。
    ///
    /// 購読に連続して `max_reconnect_attempts` 回失敗したら `SubscriptionInterrupted` を返す。
    pub async fn run(
        &self,
        session: &SessionContext,
        cancel: CancellationToken,
    ) -> Result<(), FeedError> {
        let user = session.require_user()?.clone();
        let mut failures: u32 = 0;

        let result = loop {
            self.set_status(SubscriptionStatus::Pending);
            let subscribed = tokio::select! {
                _ = cancel.cancelled() => break Ok(()),
                result = self.gateway.subscribe_notification_events(&user.id) => result,
            };

            let subscription = match subscribed {
                Ok(subscription) => subscription,
                Err(err) => {
                    failures += 1;
                    warn!(
                        "Notification subscribe attempt {}/{} failed: {}",
                        failures, self.config.max_reconnect_attempts, err
                    );
                    self.set_status(SubscriptionStatus::NeedsResync);
                    if failures >= self.config.max_reconnect_attempts {
                        break Err(FeedError::SubscriptionInterrupted {
                            reason: err.to_string(),
                        });
                    }
                    if !self.back_off(failures, &cancel).await {
                        break Ok(());
                    }
                    continue;
                }
            };
            failures = 0;

            if let Err(err) = self.load(session).await {
                warn!("Notification resync after subscribe failed: {}", err);
            }
            self.set_status(SubscriptionStatus::Subscribed);
            info!("Subscribed to notifications for {}", user.id);

            if !self.pump(session, subscription, &cancel).await {
                break Ok(());
            }

            let interrupted = FeedError::SubscriptionInterrupted {
                reason: "push channel closed".to_string(),
            };
            warn!("{}", interrupted);
            self.set_status(SubscriptionStatus::NeedsResync);
            if !self.back_off(1, &cancel).await {
                break Ok(());
            }
        };

        self.set_status(SubscriptionStatus::Stopped);
        info!("Notification stream for {} stopped", user.id);
        result
    }

    /// チャネルが閉じたら `true`、キャンセルされたら `false`
    async fn pump(
        &self,
        session: &SessionContext,
        mut subscription: NotificationSubscription,
        cancel: &CancellationToken,
    ) -> bool {
        loop {
            let frame = tokio::select! {
                _ = cancel.cancelled() => return false,
                frame = subscription.recv() => frame,
            };
            match frame {
                Some(frame) => {
                    // 不正なフレームは handle_frame 側でログ済み
                    let _ = self.handle_frame(session, frame);
                }
                None => return true,
            }
        }
    }

    /// 待機中にキャンセルされたら `false`
    async fn back_off(&self, attempt: u32, cancel: &CancellationToken) -> bool {
        let delay = self.config.backoff_for(attempt);
        debug!("Reconnecting notifications in {:?}", delay);
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}

