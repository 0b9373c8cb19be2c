//! # Livestock Lineup Common Library
//!
//! Shared code for the lineup server and the exhibitor notifier:
//! - Database schema, models and queries
//! - Event types (LineupEvent enum) and EventBus
//! - Breed-call matcher and notification dispatcher
//! - Configuration loading
//! - Lineup print formatting

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod notify;
pub mod print;
pub mod sse;

pub use error::{Error, Result};
pub use notify::{MatcherConfig, NotificationRule, RuleMatch};
