use serde::{Deserialize, Serialize};
use std::fmt;

/// 文字列 ID の newtype を定義する。
///
/// エンティティ同士は所有ポインタではなく ID で参照し合い、
/// 実体は EntityCache から引く。
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, String> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(format!("{} cannot be empty", $label));
                }
                Ok(Self(value))
            }

            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(PostId, "Post ID");
entity_id!(CommentId, "Comment ID");
entity_id!(LikeId, "Like ID");
entity_id!(NotificationId, "Notification ID");
entity_id!(UserId, "User ID");
entity_id!(
    /// 投稿に添付された画像リソースの ID
    ImageId,
    "Image ID"
);

const PENDING_PREFIX: &str = "pending-";

impl CommentId {
    /// リモート確定前の仮コメント ID
    pub fn provisional() -> Self {
        Self(format!("{PENDING_PREFIX}{}", uuid::Uuid::new_v4()))
    }

    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PENDING_PREFIX)
    }
}
