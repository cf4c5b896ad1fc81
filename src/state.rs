use crate::application::ports::RemoteDataGateway;
use crate::application::services::{
    FeedItem, FeedLoadReport, FeedLoader, FeedViewProjector, InteractionCoordinator,
    NotificationStream, SavedSetTracker,
};
use crate::domain::entities::SessionContext;
use crate::domain::value_objects::{FeedViewState, PostId};
use crate::infrastructure::cache::EntityCache;
use crate::shared::config::FeedConfig;
use crate::shared::error::FeedError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// フィード画面 1 つ分の状態。キャッシュと各サービスを束ねる。
#[derive(Clone)]
pub struct FeedState {
    pub cache: Arc<EntityCache>,
    pub interactions: Arc<InteractionCoordinator>,
    pub notifications: Arc<NotificationStream>,
    pub loader: Arc<FeedLoader>,
    pub projector: FeedViewProjector,
    saved: Arc<Mutex<SavedSetTracker>>,
}

impl FeedState {
    pub fn new(gateway: Arc<dyn RemoteDataGateway>, config: FeedConfig) -> Result<Self, FeedError> {
        config.validate().map_err(FeedError::Configuration)?;

        let cache = Arc::new(EntityCache::new());
        let interactions = Arc::new(InteractionCoordinator::new(
            Arc::clone(&gateway),
            Arc::clone(&cache),
            config.interaction.clone(),
        ));
        let notifications = Arc::new(NotificationStream::new(
            Arc::clone(&gateway),
            Arc::clone(&cache),
            config.notifications.clone(),
        ));
        let loader = Arc::new(FeedLoader::new(gateway, &cache));

        Ok(Self {
            cache,
            interactions,
            notifications,
            loader,
            projector: FeedViewProjector::new(&config.feed),
            saved: Arc::new(Mutex::new(SavedSetTracker::new())),
        })
    }

    fn saved(&self) -> MutexGuard<'_, SavedSetTracker> {
        self.saved.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 投稿一覧と通知をまとめて読み込む。未ログインなら通知は読まない。
    pub async fn initialize(&self, session: &SessionContext) -> Result<FeedLoadReport, FeedError> {
        let report = self.loader.load().await?;
        if session.user().is_some() {
            self.notifications.load(session).await?;
        }
        Ok(report)
    }

    pub fn project(&self, view: &FeedViewState, session: &SessionContext) -> Vec<FeedItem> {
        let snapshot = self.cache.snapshot();
        let saved = self.saved();
        self.projector
            .project(&snapshot, view, saved.saved(), session)
    }

    pub fn toggle_saved(&self, post_id: &PostId) -> bool {
        self.saved().toggle(post_id)
    }

    pub fn is_saved(&self, post_id: &PostId) -> bool {
        self.saved().is_saved(post_id)
    }

    /// ログアウト時。キャッシュと保存済み集合を捨てる
    pub fn reset(&self) {
        self.cache.clear();
        self.saved().clear();
    }
}
