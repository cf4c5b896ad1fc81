use tracing::info;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::ports::{GatewayError, NotificationSubscription, RemoteDataGateway};
pub use application::services::{
    FeedItem, FeedLoadReport, FeedLoader, FeedViewProjector, InteractionCoordinator,
    LikeToggleOutcome, NotificationStream, SavedSet, SavedSetTracker, SubscriptionStatus,
};
pub use infrastructure::cache::{EntityCache, FeedSnapshot};
pub use shared::{FeedConfig, FeedError, ToggleDiscipline};
pub use state::FeedState;

/// ログ設定の初期化。`RUST_LOG` があればそちらを優先する。
///
/// 既に subscriber が登録済みなら何もしない。
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let initialized = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vibez_lib=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if initialized {
        info!("Vibez feed engine logging initialized");
    }
}
