mod common;

use common::fixtures::{create_test_post, post_id, session, user_id};
use common::mocks::InMemoryGateway;
use std::sync::Arc;
use vibez_lib::application::ports::RemoteDataGateway;
use vibez_lib::application::services::{FeedLoader, InteractionCoordinator};
use vibez_lib::domain::entities::NotificationKind;
use vibez_lib::infrastructure::cache::EntityCache;
use vibez_lib::shared::config::InteractionConfig;
use vibez_lib::shared::error::FeedError;

async fn setup(
    author: &str,
) -> (
    Arc<InMemoryGateway>,
    Arc<EntityCache>,
    Arc<InteractionCoordinator>,
) {
    let gateway = Arc::new(InMemoryGateway::with_posts(vec![create_test_post(
        "p1", author, 0,
    )]));
    let cache = Arc::new(EntityCache::new());
    let remote: Arc<dyn RemoteDataGateway> = gateway.clone();
    FeedLoader::new(remote, &cache).load().await.unwrap();
    let coordinator = Arc::new(InteractionCoordinator::new(
        gateway.clone(),
        Arc::clone(&cache),
        InteractionConfig {
            max_comment_length: 20,
            ..InteractionConfig::default()
        },
    ));
    (gateway, cache, coordinator)
}

#[tokio::test]
async fn test_blank_comment_makes_no_remote_call() {
    let (gateway, cache, coordinator) = setup("vera").await;
    let calls_before = gateway.calls().len();

    for text in ["", "   ", "\n\t "] {
        let result = coordinator
            .add_comment(&session("una", "Una"), &post_id("p1"), text)
            .await;
        assert_eq!(result, Err(FeedError::EmptyComment));
    }

    assert_eq!(gateway.calls().len(), calls_before);
    assert!(cache.comments_for(&post_id("p1")).is_empty());
}

#[tokio::test]
async fn test_overlong_comment_is_rejected_locally() {
    let (gateway, _cache, coordinator) = setup("vera").await;

    let result = coordinator
        .add_comment(&session("una", "Una"), &post_id("p1"), &"x".repeat(21))
        .await;

    assert_eq!(result, Err(FeedError::CommentTooLong { max: 20 }));
    assert_eq!(gateway.call_count("create_comment"), 0);
}

#[tokio::test]
async fn test_comment_is_stored_and_author_notified() {
    let (gateway, cache, coordinator) = setup("vera").await;

    let comment = coordinator
        .add_comment(&session("una", "Una"), &post_id("p1"), "  nice post  ")
        .await
        .unwrap();

    assert_eq!(comment.text, "nice post");
    assert!(!comment.is_provisional());
    let cached = cache.comments_for(&post_id("p1"));
    assert_eq!(cached, vec![comment.clone()]);

    let notifications = gateway.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Comment);
    assert_eq!(notifications[0].recipient_id, user_id("vera"));
    assert_eq!(notifications[0].comment_id, Some(comment.id.clone()));
    assert_eq!(
        notifications[0].message,
        "Una commented on your post \"Post p1\""
    );
}

#[tokio::test]
async fn test_comment_on_own_post_skips_notification() {
    let (gateway, _cache, coordinator) = setup("una").await;

    coordinator
        .add_comment(&session("una", "Una"), &post_id("p1"), "replying to myself")
        .await
        .unwrap();

    assert_eq!(gateway.call_count("create_notification"), 0);
}

#[tokio::test]
async fn test_failed_comment_rolls_back_provisional_entry() {
    let (gateway, cache, coordinator) = setup("vera").await;
    gateway.fail("create_comment");

    let result = coordinator
        .add_comment(&session("una", "Una"), &post_id("p1"), "hello")
        .await;

    assert!(matches!(result, Err(FeedError::CommentActionFailed { .. })));
    assert!(cache.comments_for(&post_id("p1")).is_empty());
    assert_eq!(gateway.call_count("create_notification"), 0);
}

#[tokio::test]
async fn test_provisional_comment_is_visible_until_confirmed() {
    let (gateway, cache, coordinator) = setup("vera").await;
    gateway.pause_writes();

    let pending = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            coordinator
                .add_comment(&session("una", "Una"), &post_id("p1"), "first!")
                .await
        })
    };
    gateway.wait_for_write().await;

    let visible = cache.comments_for(&post_id("p1"));
    assert_eq!(visible.len(), 1);
    assert!(visible[0].is_provisional());
    assert_eq!(visible[0].text, "first!");

    gateway.resume_writes();
    let confirmed = pending.await.unwrap().unwrap();
    assert_eq!(cache.comments_for(&post_id("p1")), vec![confirmed]);
}

#[tokio::test]
async fn test_refetch_failure_keeps_confirmed_comment() {
    let (gateway, cache, coordinator) = setup("vera").await;
    gateway.fail("fetch_comments");

    let comment = coordinator
        .add_comment(&session("una", "Una"), &post_id("p1"), "still here")
        .await
        .unwrap();

    let cached = cache.comments_for(&post_id("p1"));
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].id, comment.id);
}
