//! Notification dispatch
//!
//! Both notification channels (the polling matcher and the push stream) hand
//! their alerts to one [`NotificationDispatcher`]. The dispatcher remembers
//! every [`AlertKey`] it has delivered and drops repeats until [`reset`] is
//! called, so a breed call reaches the user once no matter how many cycles or
//! channels report it.
//!
//! [`reset`]: NotificationDispatcher::reset

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::matcher::{NotificationRule, RuleMatch};

/// Channel an alert arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSource {
    Poll,
    Push,
}

impl fmt::Display for AlertSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSource::Poll => write!(f, "poll"),
            AlertSource::Push => write!(f, "push"),
        }
    }
}

/// Identity of a delivered alert: the rule plus the exhibitor it applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AlertKey {
    pub breed: String,
    pub category: String,
    pub show: String,
    pub exhibitor_id: String,
}

impl AlertKey {
    pub fn new(rule: &NotificationRule, exhibitor_id: impl Into<String>) -> Self {
        Self {
            breed: rule.breed.clone(),
            category: rule.category.clone(),
            show: rule.show.clone(),
            exhibitor_id: exhibitor_id.into(),
        }
    }
}

/// A breed call for one exhibitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub key: AlertKey,
    pub source: AlertSource,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn new(key: AlertKey, source: AlertSource) -> Self {
        Self {
            key,
            source,
            timestamp: Utc::now(),
        }
    }

    pub fn from_match(rule_match: &RuleMatch, source: AlertSource) -> Self {
        Self::new(AlertKey::new(&rule_match.rule, rule_match.exhibitor_id.clone()), source)
    }

    /// Text shown to the exhibitor
    pub fn message(&self) -> String {
        format!(
            "Your breed ({}) is up next! Category: {}, Show: {}",
            self.key.breed, self.key.category, self.key.show
        )
    }
}

/// Where alerts end up (terminal, desktop notification, test recorder)
pub trait AlertSink: Send + Sync {
    fn deliver(&self, alert: &Alert);
}

/// Single delivery point with an "already notified" set
pub struct NotificationDispatcher {
    sink: Arc<dyn AlertSink>,
    notified: Mutex<HashSet<AlertKey>>,
}

impl NotificationDispatcher {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self {
            sink,
            notified: Mutex::new(HashSet::new()),
        }
    }

    /// Deliver `alert` unless its key was already delivered.
    ///
    /// Returns true when the sink was invoked.
    pub fn dispatch(&self, alert: Alert) -> bool {
        let first_time = {
            let mut notified = self.notified.lock().unwrap_or_else(|e| e.into_inner());
            notified.insert(alert.key.clone())
        };

        if !first_time {
            debug!(
                breed = %alert.key.breed,
                exhibitor = %alert.key.exhibitor_id,
                source = %alert.source,
                "Alert already delivered, suppressed"
            );
            return false;
        }

        info!(
            breed = %alert.key.breed,
            category = %alert.key.category,
            show = %alert.key.show,
            exhibitor = %alert.key.exhibitor_id,
            source = %alert.source,
            "Delivering breed call alert"
        );
        self.sink.deliver(&alert);
        true
    }

    /// Dispatch a batch, returning how many were delivered
    pub fn dispatch_all(&self, alerts: impl IntoIterator<Item = Alert>) -> usize {
        alerts
            .into_iter()
            .map(|alert| self.dispatch(alert))
            .filter(|delivered| *delivered)
            .count()
    }

    /// Forget every delivered key
    pub fn reset(&self) {
        let mut notified = self.notified.lock().unwrap_or_else(|e| e.into_inner());
        let cleared = notified.len();
        notified.clear();
        info!("Notification history reset ({} entries cleared)", cleared);
    }

    pub fn notified_count(&self) -> usize {
        self.notified.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Sink that records alerts in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    alerts: Mutex<Vec<Alert>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AlertSink for MemorySink {
    fn deliver(&self, alert: &Alert) {
        self.alerts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(alert.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holland_alert(exhibitor: &str, source: AlertSource) -> Alert {
        let rule = NotificationRule::new("Holland Lop", "Youth", "A");
        Alert::new(AlertKey::new(&rule, exhibitor), source)
    }

    #[test]
    fn first_alert_is_delivered_repeat_is_suppressed() {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        assert!(dispatcher.dispatch(holland_alert("ex-1", AlertSource::Poll)));
        assert!(!dispatcher.dispatch(holland_alert("ex-1", AlertSource::Poll)));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn push_and_poll_share_one_history() {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        assert!(dispatcher.dispatch(holland_alert("ex-1", AlertSource::Push)));
        assert!(!dispatcher.dispatch(holland_alert("ex-1", AlertSource::Poll)));

        let alerts = sink.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].source, AlertSource::Push);
    }

    #[test]
    fn different_exhibitors_are_different_alerts() {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        let delivered = dispatcher.dispatch_all(vec![
            holland_alert("ex-1", AlertSource::Poll),
            holland_alert("ex-2", AlertSource::Poll),
            holland_alert("ex-1", AlertSource::Poll),
        ]);
        assert_eq!(delivered, 2);
        assert_eq!(dispatcher.notified_count(), 2);
    }

    #[test]
    fn reset_allows_redelivery() {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        dispatcher.dispatch(holland_alert("ex-1", AlertSource::Poll));
        dispatcher.reset();
        assert_eq!(dispatcher.notified_count(), 0);

        assert!(dispatcher.dispatch(holland_alert("ex-1", AlertSource::Poll)));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn message_names_breed_category_and_show() {
        let alert = holland_alert("ex-1", AlertSource::Push);
        assert_eq!(
            alert.message(),
            "Your breed (Holland Lop) is up next! Category: Youth, Show: A"
        );
    }
}
