mod in_flight;

use crate::application::ports::remote_gateway::{GatewayError, RemoteDataGateway};
use crate::domain::entities::{Comment, Like, NewNotification, Post, SessionContext, SessionUser};
use crate::domain::value_objects::{CommentId, LikeId, PostId, UserId};
use crate::infrastructure::cache::EntityCache;
use crate::shared::config::InteractionConfig;
use crate::shared::error::FeedError;
use in_flight::InFlightRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// いいね切り替えの確定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeToggleOutcome {
    pub post_id: PostId,
    pub liked: bool,
    pub like_count: usize,
}

enum LikeChange {
    Added(Like),
    Removed(LikeId),
}

/// いいね・コメント・投稿削除のユーザー操作を実行する。
///
/// リモートへの書き込み、投稿者への通知、キャッシュの再取得までを 1 つの操作として扱う。
pub struct InteractionCoordinator {
    gateway: Arc<dyn RemoteDataGateway>,
    cache: Arc<EntityCache>,
    in_flight: InFlightRegistry,
    config: InteractionConfig,
}

impl InteractionCoordinator {
    pub fn new(
        gateway: Arc<dyn RemoteDataGateway>,
        cache: Arc<EntityCache>,
        config: InteractionConfig,
    ) -> Self {
        Self {
            gateway,
            cache,
            in_flight: InFlightRegistry::new(),
            config,
        }
    }

    /// 投稿に対するいいね操作が処理中かどうか（UI のボタン無効化用）
    pub fn is_toggle_in_flight(&self, post_id: &PostId) -> bool {
        self.in_flight.is_in_flight(post_id)
    }

    /// いいね済みなら取り消し、未いいねならいいねする。
    pub async fn toggle_like(
        &self,
        session: &SessionContext,
        post_id: &PostId,
    ) -> Result<LikeToggleOutcome, FeedError> {
        let user = session.require_user()?;
        if self.cache.post(post_id).is_none() {
            return Err(FeedError::PostNotFound(post_id.clone()));
        }

        let _guard = self
            .in_flight
            .acquire(post_id, self.config.toggle_discipline)
            .await?;
        // 待っている間に投稿が削除されていることがある
        let post = self
            .cache
            .post(post_id)
            .ok_or_else(|| FeedError::PostNotFound(post_id.clone()))?;

        // 判定はガード取得後の一覧で行う（Queue で待たされた場合に先行結果を反映するため）
        let likes = match self.cache.likes_for(post_id) {
            Some(likes) => likes,
            None => self
                .gateway
                .fetch_likes(post_id)
                .await
                .map_err(|err| like_failed(post_id, err))?,
        };

        let change = match likes.iter().find(|like| like.is_by(&user.id)) {
            Some(existing) => {
                self.gateway
                    .delete_like(&existing.id)
                    .await
                    .map_err(|err| like_failed(post_id, err))?;
                LikeChange::Removed(existing.id.clone())
            }
            None => {
                let created = self
                    .gateway
                    .create_like(post_id, &user.id)
                    .await
                    .map_err(|err| like_failed(post_id, err))?;
                self.notify_author(&post, user, |author| {
                    NewNotification::like(author, &user.display_name, &post.title, post_id.clone())
                })
                .await;
                LikeChange::Added(created)
            }
        };

        let likes = self.refresh_likes(post_id, likes, change).await;
        let liked = likes.iter().any(|like| like.is_by(&user.id));
        info!(
            "User {} {} post {} ({} likes)",
            user.id,
            if liked { "liked" } else { "unliked" },
            post_id,
            likes.len()
        );

        Ok(LikeToggleOutcome {
            post_id: post_id.clone(),
            liked,
            like_count: likes.len(),
        })
    }

    /// コメントを投稿する。確定までは仮コメントをキャッシュに表示し、失敗したら取り除く。
    pub async fn add_comment(
        &self,
        session: &SessionContext,
        post_id: &PostId,
        text: &str,
    ) -> Result<Comment, FeedError> {
        let user = session.require_user()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(FeedError::EmptyComment);
        }
        let max = self.config.max_comment_length;
        if text.chars().count() > max {
            return Err(FeedError::CommentTooLong { max });
        }
        let post = self
            .cache
            .post(post_id)
            .ok_or_else(|| FeedError::PostNotFound(post_id.clone()))?;

        let provisional = Comment::provisional(
            post_id.clone(),
            user.id.clone(),
            user.display_name.clone(),
            text.to_string(),
        );
        let provisional_id = provisional.id.clone();
        self.cache.append_comment(provisional);

        let created = match self
            .gateway
            .create_comment(post_id, &user.id, &user.display_name, text)
            .await
        {
            Ok(comment) => comment,
            Err(err) => {
                self.cache.remove_comment(post_id, &provisional_id);
                warn!("Failed to create comment on post {}: {}", post_id, err);
                return Err(FeedError::CommentActionFailed {
                    post_id: post_id.clone(),
                    reason: err.to_string(),
                });
            }
        };

        self.notify_author(&post, user, |author| {
            NewNotification::comment(
                author,
                &user.display_name,
                &post.title,
                post_id.clone(),
                created.id.clone(),
            )
        })
        .await;

        self.refresh_comments(post_id, &provisional_id, &created).await;
        info!("User {} commented on post {}", user.id, post_id);
        Ok(created)
    }

    /// 投稿を削除し、添付画像があれば続けて削除する。
    ///
    /// 投稿の削除に失敗した場合はキャッシュを変更しない。画像の削除だけが失敗した場合は
    /// 投稿をキャッシュから外したうえで `PartialDeleteFailure` を返す。
    pub async fn delete_post(
        &self,
        session: &SessionContext,
        post_id: &PostId,
    ) -> Result<Post, FeedError> {
        let user = session.require_user()?;
        let post = self
            .cache
            .post(post_id)
            .ok_or_else(|| FeedError::PostNotFound(post_id.clone()))?;
        if !post.is_authored_by(&user.id) {
            return Err(FeedError::NotPostAuthor {
                post_id: post_id.clone(),
            });
        }

        if let Err(err) = self.gateway.delete_post(post_id).await {
            warn!("Failed to delete post {}: {}", post_id, err);
            return Err(FeedError::DeleteFailed {
                post_id: post_id.clone(),
                reason: err.to_string(),
            });
        }
        let removed = self.cache.remove_post(post_id).unwrap_or(post);
        self.in_flight.forget(post_id);

        if let Some(image_id) = removed.image_id.as_ref() {
            if let Err(err) = self.gateway.delete_image(image_id).await {
                warn!(
                    "Post {} deleted but image {} remains: {}",
                    post_id, image_id, err
                );
                return Err(FeedError::PartialDeleteFailure {
                    post_id: post_id.clone(),
                    image_id: image_id.clone(),
                    reason: err.to_string(),
                });
            }
        }

        info!("User {} deleted post {}", user.id, post_id);
        Ok(removed)
    }

    /// 自分の投稿への操作では通知しない。通知の失敗は操作自体の失敗にしない。
    async fn notify_author<F>(&self, post: &Post, actor: &SessionUser, build: F)
    where
        F: FnOnce(UserId) -> NewNotification,
    {
        if post.is_authored_by(&actor.id) {
            debug!("Skipping self notification on post {}", post.id);
            return;
        }
        let notification = build(post.author_id.clone());
        let kind = notification.kind;
        if let Err(err) = self.gateway.create_notification(notification).await {
            warn!(
                "Failed to create {} notification for {} on post {}: {}",
                kind, post.author_id, post.id, err
            );
        }
    }

    /// 確定後にリモートの一覧で置き換える。取得できなければ確定結果を手元で反映する。
    async fn refresh_likes(
        &self,
        post_id: &PostId,
        previous: Vec<Like>,
        change: LikeChange,
    ) -> Vec<Like> {
        let likes = match self.gateway.fetch_likes(post_id).await {
            Ok(likes) => likes,
            Err(err) => {
                warn!(
                    "Failed to refetch likes for post {}, applying local result: {}",
                    post_id, err
                );
                let mut likes = previous;
                match change {
                    LikeChange::Added(like) => {
                        likes.retain(|existing| existing.id != like.id);
                        likes.push(like);
                    }
                    LikeChange::Removed(like_id) => likes.retain(|existing| existing.id != like_id),
                }
                likes
            }
        };
        self.cache.upsert_likes(post_id, likes.clone());
        likes
    }

    async fn refresh_comments(
        &self,
        post_id: &PostId,
        provisional_id: &CommentId,
        created: &Comment,
    ) {
        match self.gateway.fetch_comments(post_id).await {
            Ok(comments) => {
                self.cache.upsert_comments(post_id, comments);
            }
            Err(err) => {
                warn!(
                    "Failed to refetch comments for post {}, applying local result: {}",
                    post_id, err
                );
                self.cache.remove_comment(post_id, provisional_id);
                self.cache.append_comment(created.clone());
            }
        }
    }
}

fn like_failed(post_id: &PostId, err: GatewayError) -> FeedError {
    warn!("Like action on post {} failed: {}", post_id, err);
    FeedError::LikeActionFailed {
        post_id: post_id.clone(),
        reason: err.to_string(),
    }
}
