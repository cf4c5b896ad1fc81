use serde::{Deserialize, Serialize};
use std::fmt;

/// フィードのタブ
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedTab {
    #[default]
    Latest,
    Popular,
    Saved,
}

impl FeedTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedTab::Latest => "latest",
            FeedTab::Popular => "popular",
            FeedTab::Saved => "saved",
        }
    }
}

impl fmt::Display for FeedTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 表示中のタブと検索文字列。セッション内だけで保持し永続化しない。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedViewState {
    pub tab: FeedTab,
    pub filter: String,
}

impl FeedViewState {
    pub fn new(tab: FeedTab) -> Self {
        Self {
            tab,
            filter: String::new(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// 前後の空白を除いた検索語。空なら `None`。
    pub fn query(&self) -> Option<&str> {
        let trimmed = self.filter.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}
