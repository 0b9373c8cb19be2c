//! lineup-notify library - exhibitor-side breed call notifier
//!
//! Two channels feed one [`NotificationDispatcher`]: a poller that matches the
//! configured rules against the server's submissions, and a listener on the
//! server's push stream.
//!
//! [`NotificationDispatcher`]: lineup_common::notify::NotificationDispatcher

pub mod alert;
pub mod client;
pub mod config;
pub mod poller;
pub mod push;

pub use alert::TerminalAlert;
pub use client::{ClientError, LineupClient, SubmissionSource};
pub use config::{CliOverrides, NotifyConfig};
pub use poller::Poller;
pub use push::{handle_push_event, PushListener, PushOutcome};
