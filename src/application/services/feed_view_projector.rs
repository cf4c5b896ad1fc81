use crate::application::services::saved_set_tracker::SavedSet;
use crate::domain::entities::{Post, SessionContext};
use crate::domain::value_objects::{FeedTab, FeedViewState};
use crate::infrastructure::cache::FeedSnapshot;
use crate::shared::config::FeedViewConfig;
use regex::{Regex, RegexBuilder};
use std::cmp::Reverse;

const ELLIPSIS: &str = "...";

/// 1 件分の表示データ
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub post: Post,
    pub like_count: usize,
    pub comment_count: usize,
    pub liked_by_viewer: bool,
    pub saved: bool,
}

impl FeedItem {
    /// カード用の本文プレビュー。`max_chars` を超える分は省略記号に置き換える。
    pub fn preview(&self, max_chars: usize) -> String {
        let text = self.post.body_text();
        if text.chars().count() <= max_chars {
            return text;
        }
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    }
}

enum Matcher {
    Pattern(Regex),
    Substring(String),
}

impl Matcher {
    fn new(query: &str, pattern_search: bool) -> Self {
        if pattern_search {
            if let Ok(regex) = RegexBuilder::new(query).case_insensitive(true).build() {
                return Matcher::Pattern(regex);
            }
        }
        Matcher::Substring(query.to_lowercase())
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Pattern(regex) => regex.is_match(text),
            Matcher::Substring(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }

    fn matches_post(&self, post: &Post) -> bool {
        self.is_match(&post.title) || self.is_match(&post.body_text())
    }
}

/// キャッシュのスナップショットから表示用の投稿リストを導出する。
///
/// 副作用はなく、状態が変わるたびに全件を計算し直す前提。
#[derive(Debug, Clone)]
pub struct FeedViewProjector {
    pattern_search: bool,
}

impl FeedViewProjector {
    pub fn new(config: &FeedViewConfig) -> Self {
        Self {
            pattern_search: config.pattern_search,
        }
    }

    pub fn project(
        &self,
        snapshot: &FeedSnapshot,
        view: &FeedViewState,
        saved: &SavedSet,
        session: &SessionContext,
    ) -> Vec<FeedItem> {
        let matcher = view
            .query()
            .map(|query| Matcher::new(query, self.pattern_search));

        let mut items: Vec<FeedItem> = snapshot
            .posts
            .iter()
            .filter(|post| post.is_active())
            .filter(|post| view.tab != FeedTab::Saved || saved.contains(&post.id))
            .filter(|post| matcher.as_ref().map_or(true, |m| m.matches_post(post)))
            .map(|post| FeedItem {
                post: post.clone(),
                like_count: snapshot.like_count(&post.id),
                comment_count: snapshot.comment_count(&post.id),
                liked_by_viewer: session
                    .user_id()
                    .is_some_and(|user_id| snapshot.liked_by(&post.id, user_id)),
                saved: saved.contains(&post.id),
            })
            .collect();

        // sort_by_key は安定ソートなので同順位は入力順のまま
        match view.tab {
            FeedTab::Latest => items.sort_by_key(|item| Reverse(item.post.created_at)),
            FeedTab::Popular => {
                items.sort_by_key(|item| (Reverse(item.like_count), Reverse(item.post.created_at)))
            }
            FeedTab::Saved => {}
        }
        items
    }
}

impl Default for FeedViewProjector {
    fn default() -> Self {
        Self {
            pattern_search: true,
        }
    }
}
