use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use vibez_lib::domain::entities::{
    Notification, NotificationKind, Post, PostStatus, SessionContext, SessionUser,
};
use vibez_lib::domain::value_objects::{ImageId, NotificationId, PostId, UserId};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

pub fn user_id(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn post_id(id: &str) -> PostId {
    PostId::new(id).unwrap()
}

pub fn session(id: &str, name: &str) -> SessionContext {
    SessionContext::signed_in(SessionUser::new(user_id(id), name))
}

pub fn create_test_post(id: &str, author: &str, minutes: i64) -> Post {
    Post {
        id: post_id(id),
        title: format!("Post {id}"),
        body: format!("<p>Body of <em>{id}</em></p>"),
        image_id: None,
        author_id: user_id(author),
        author_name: format!("Author {author}"),
        status: PostStatus::Active,
        created_at: base_time() + Duration::minutes(minutes),
    }
}

pub fn create_test_post_with_image(id: &str, author: &str, image: &str) -> Post {
    create_test_post(id, author, 0).with_image(ImageId::new(image).unwrap())
}

pub fn create_test_notification(id: &str, recipient: &str, minutes: i64) -> Notification {
    Notification {
        id: NotificationId::new(id).unwrap(),
        recipient_id: user_id(recipient),
        kind: NotificationKind::Like,
        message: "Someone liked your post \"Post p1\"".to_string(),
        post_id: post_id("p1"),
        comment_id: None,
        read: false,
        created_at: base_time() + Duration::minutes(minutes),
    }
}

pub fn created_frame(notification: &Notification) -> serde_json::Value {
    json!({ "type": "created", "notification": notification })
}

pub fn updated_frame(notification: &Notification) -> serde_json::Value {
    json!({ "type": "updated", "notification": notification })
}
