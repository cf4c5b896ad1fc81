use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 同一投稿へのいいね操作が重なったときの扱い
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToggleDiscipline {
    /// 先行操作が終わるまで後続を `ActionInProgress` で拒否する
    #[default]
    Reject,
    /// 先行操作の完了を待ってから後続を実行する
    Queue,
}

impl ToggleDiscipline {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(Self::Reject),
            "queue" => Some(Self::Queue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub interaction: InteractionConfig,
    pub notifications: NotificationConfig,
    pub feed: FeedViewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    #[serde(default)]
    pub toggle_discipline: ToggleDiscipline,
    pub max_comment_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub page_size: usize,
    pub reconnect_backoff_ms: u64,
    pub max_reconnect_backoff_ms: u64,
    pub max_reconnect_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedViewConfig {
    pub pattern_search: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            interaction: InteractionConfig::default(),
            notifications: NotificationConfig::default(),
            feed: FeedViewConfig {
                pattern_search: true,
            },
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            toggle_discipline: ToggleDiscipline::Reject,
            max_comment_length: 2000,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            reconnect_backoff_ms: 1000,
            max_reconnect_backoff_ms: 30_000,
            max_reconnect_attempts: 10,
        }
    }
}

impl NotificationConfig {
    /// 再接続 `attempt` 回目（1 始まり）の待機時間。指数バックオフで上限あり。
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self
            .reconnect_backoff_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_reconnect_backoff_ms);
        Duration::from_millis(delay)
    }
}

impl FeedConfig {
    pub fn from_env() -> Self {
        // 既定値
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("VIBEZ_TOGGLE_DISCIPLINE") {
            if let Some(discipline) = ToggleDiscipline::parse(&v) {
                cfg.interaction.toggle_discipline = discipline;
            }
        }
        if let Ok(v) = std::env::var("VIBEZ_MAX_COMMENT_LENGTH") {
            if let Some(value) = parse_usize(&v) {
                cfg.interaction.max_comment_length = value;
            }
        }
        if let Ok(v) = std::env::var("VIBEZ_NOTIFICATION_PAGE_SIZE") {
            if let Some(value) = parse_usize(&v) {
                cfg.notifications.page_size = value;
            }
        }
        if let Ok(v) = std::env::var("VIBEZ_RECONNECT_BACKOFF_MS") {
            if let Some(value) = parse_u64(&v) {
                cfg.notifications.reconnect_backoff_ms = value;
            }
        }
        if let Ok(v) = std::env::var("VIBEZ_MAX_RECONNECT_BACKOFF_MS") {
            if let Some(value) = parse_u64(&v) {
                cfg.notifications.max_reconnect_backoff_ms = value;
            }
        }
        if let Ok(v) = std::env::var("VIBEZ_MAX_RECONNECT_ATTEMPTS") {
            if let Some(value) = parse_u32(&v) {
                cfg.notifications.max_reconnect_attempts = value;
            }
        }
        if let Ok(v) = std::env::var("VIBEZ_PATTERN_SEARCH") {
            cfg.feed.pattern_search = parse_bool(&v, cfg.feed.pattern_search);
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.interaction.max_comment_length == 0 {
            return Err("Interaction max_comment_length must be greater than 0".to_string());
        }
        if self.notifications.page_size == 0 {
            return Err("Notification page_size must be greater than 0".to_string());
        }
        if self.notifications.reconnect_backoff_ms == 0 {
            return Err("Notification reconnect_backoff_ms must be greater than 0".to_string());
        }
        if self.notifications.max_reconnect_backoff_ms < self.notifications.reconnect_backoff_ms {
            return Err(
                "Notification max_reconnect_backoff_ms must not be below reconnect_backoff_ms"
                    .to_string(),
            );
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}
