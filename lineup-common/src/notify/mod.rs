//! Breed-call notification matching and dispatch
//!
//! The matcher decides which submissions a breed call applies to; the
//! dispatcher is the single path from any notification channel (polling or
//! push) to the user-facing alert.

pub mod dispatch;
pub mod matcher;

pub use dispatch::{Alert, AlertKey, AlertSink, AlertSource, MemorySink, NotificationDispatcher};
pub use matcher::{find_matches, MatcherConfig, NotificationRule, RuleMatch, SubmissionEntry};
