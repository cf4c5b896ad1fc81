pub mod config;
pub mod error;

pub use config::{
    FeedConfig, FeedViewConfig, InteractionConfig, NotificationConfig, ToggleDiscipline,
};
pub use error::{FeedError, Result};
