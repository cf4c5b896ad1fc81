use crate::application::ports::remote_gateway::{GatewayError, RemoteDataGateway};
use crate::domain::entities::{Comment, Like};
use crate::domain::value_objects::PostId;
use crate::infrastructure::cache::EntityCache;
use crate::shared::error::FeedError;
use futures::future::join_all;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// 初回ロードの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedLoadReport {
    pub posts: usize,
    /// コメントかいいねの取得に失敗した投稿
    pub failed: Vec<PostId>,
    /// 取得完了時にキャッシュが破棄されていた
    pub abandoned: bool,
}

impl FeedLoadReport {
    fn abandoned() -> Self {
        Self {
            abandoned: true,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.abandoned && self.failed.is_empty()
    }
}

struct PostChildren {
    post_id: PostId,
    comments: Result<Vec<Comment>, GatewayError>,
    likes: Result<Vec<Like>, GatewayError>,
}

/// 投稿一覧と、各投稿のコメント・いいねをまとめて取得する。
///
/// 投稿一覧は取得結果で置き換えるので、リモートで消えた投稿はキャッシュからも消える。
/// キャッシュは弱参照で持つ。ビューが先に破棄された場合、取得結果は捨てる。
pub struct FeedLoader {
    gateway: Arc<dyn RemoteDataGateway>,
    cache: Weak<EntityCache>,
}

impl FeedLoader {
    pub fn new(gateway: Arc<dyn RemoteDataGateway>, cache: &Arc<EntityCache>) -> Self {
        Self {
            gateway,
            cache: Arc::downgrade(cache),
        }
    }

    pub async fn load(&self) -> Result<FeedLoadReport, FeedError> {
        let posts = self.gateway.fetch_active_posts().await.map_err(|err| {
            warn!("Failed to fetch active posts: {}", err);
            FeedError::LoadFailed {
                reason: err.to_string(),
            }
        })?;

        let post_ids: Vec<PostId> = posts.iter().map(|post| post.id.clone()).collect();
        {
            let Some(cache) = self.cache.upgrade() else {
                debug!("Feed cache dropped before posts arrived");
                return Ok(FeedLoadReport::abandoned());
            };
            cache.replace_posts(posts);
        }

        let children = join_all(post_ids.iter().map(|post_id| self.fetch_children(post_id))).await;

        let Some(cache) = self.cache.upgrade() else {
            debug!("Feed cache dropped before comments and likes arrived");
            return Ok(FeedLoadReport::abandoned());
        };

        let mut report = FeedLoadReport {
            posts: post_ids.len(),
            ..FeedLoadReport::default()
        };
        for PostChildren {
            post_id,
            comments,
            likes,
        } in children
        {
            let mut failed = false;
            match comments {
                Ok(comments) => {
                    cache.upsert_comments(&post_id, comments);
                }
                Err(err) => {
                    warn!("Failed to fetch comments for post {}: {}", post_id, err);
                    failed = true;
                }
            }
            match likes {
                Ok(likes) => {
                    cache.upsert_likes(&post_id, likes);
                }
                Err(err) => {
                    warn!("Failed to fetch likes for post {}: {}", post_id, err);
                    failed = true;
                }
            }
            if failed {
                report.failed.push(post_id);
            }
        }

        info!(
            "Loaded {} posts ({} incomplete)",
            report.posts,
            report.failed.len()
        );
        Ok(report)
    }

    async fn fetch_children(&self, post_id: &PostId) -> PostChildren {
        let (comments, likes) = tokio::join!(
            self.gateway.fetch_comments(post_id),
            self.gateway.fetch_likes(post_id)
        );
        PostChildren {
            post_id: post_id.clone(),
            comments,
            likes,
        }
    }
}
