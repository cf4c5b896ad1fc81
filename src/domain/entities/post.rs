use crate::domain::value_objects::{ImageId, PostId, UserId};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid markup tag regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Draft,
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// リッチテキストエディタが出力した整形済み本文（中身は解釈しない）
    pub body: String,
    pub image_id: Option<ImageId>,
    pub author_id: UserId,
    pub author_name: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(title: String, body: String, author_id: UserId, author_name: String) -> Self {
        Self {
            id: PostId::generate(),
            title,
            body,
            image_id: None,
            author_id,
            author_name,
            status: PostStatus::Draft,
            created_at: Utc::now(),
        }
    }

    pub fn with_image(mut self, image_id: ImageId) -> Self {
        self.image_id = Some(image_id);
        self
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == PostStatus::Active
    }

    pub fn is_authored_by(&self, user_id: &UserId) -> bool {
        &self.author_id == user_id
    }

    /// 本文からタグを除去し、主要な文字参照を戻したプレーンテキスト
    pub fn body_text(&self) -> String {
        markup_to_text(&self.body)
    }
}

pub(crate) fn markup_to_text(markup: &str) -> String {
    let without_tags = MARKUP_TAG.replace_all(markup, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WHITESPACE_RUN.replace_all(decoded.trim(), " ").into_owned()
}
