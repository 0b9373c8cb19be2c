//! Polling matcher
//!
//! Every tick fetches the current submissions, matches them against the rule
//! list and hands the hits to the dispatcher. Cycles run in their own tasks and
//! may overlap; the dispatcher's notified set keeps delivery single.

use lineup_common::notify::{find_matches, Alert, AlertSource, MatcherConfig, NotificationDispatcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::client::SubmissionSource;

pub struct Poller {
    source: Arc<dyn SubmissionSource>,
    dispatcher: Arc<NotificationDispatcher>,
    matcher: MatcherConfig,
    period: Duration,
}

impl Poller {
    pub fn new(
        source: Arc<dyn SubmissionSource>,
        dispatcher: Arc<NotificationDispatcher>,
        matcher: MatcherConfig,
        period: Duration,
    ) -> Self {
        Self {
            source,
            dispatcher,
            matcher,
            period,
        }
    }

    /// Run one fetch-and-match cycle, returning the number of alerts delivered
    ///
    /// Fetch failures are logged and the cycle is skipped.
    pub async fn run_cycle(&self) -> usize {
        let submissions = match self.source.fetch_submissions().await {
            Ok(submissions) => submissions,
            Err(e) => {
                warn!("Error fetching submissions, skipping cycle: {}", e);
                return 0;
            }
        };

        let matches = find_matches(&self.matcher, &submissions);
        debug!(
            "Poll cycle: {} submissions, {} matches",
            submissions.len(),
            matches.len()
        );

        self.dispatcher.dispatch_all(
            matches
                .iter()
                .map(|m| Alert::from_match(m, AlertSource::Poll)),
        )
    }

    /// Spawn the polling loop; one task per tick
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        info!(
            "Starting poller (interval: {}s, {} rules)",
            self.period.as_secs(),
            self.matcher.rules.len()
        );

        tokio::spawn(async move {
            let mut timer = interval(self.period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                timer.tick().await;
                let poller = Arc::clone(&self);
                tokio::spawn(async move {
                    poller.run_cycle().await;
                });
            }
        })
    }
}
