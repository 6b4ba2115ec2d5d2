//! Periodic revenue polling loop

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::notify::{group_digits, WebhookNotifier};

use super::{DeltaDetector, FetchError, MonitorState, RevenueSource};

/// Drives the revenue source on a fixed cadence and feeds results through
/// the delta detector to the notifier.
///
/// Cycles are serialized: each one is awaited to completion before the
/// next tick is taken, so an in-flight fetch can never race a second cycle
/// against the shared [`MonitorState`]. A slow fetch delays the next tick
/// rather than stacking up behind it.
pub struct Poller {
    source: RevenueSource,
    detector: DeltaDetector,
    state: Arc<RwLock<MonitorState>>,
    notifier: Arc<WebhookNotifier>,
    period: Duration,
}

impl Poller {
    /// Create a poller over the given source and shared state.
    pub fn new(
        source: RevenueSource,
        state: Arc<RwLock<MonitorState>>,
        notifier: Arc<WebhookNotifier>,
        period: Duration,
    ) -> Self {
        Self {
            source,
            detector: DeltaDetector,
            state,
            notifier,
            period,
        }
    }

    /// Run the polling loop forever.
    ///
    /// The first tick fires immediately, which doubles as the startup
    /// fetch; it only establishes the baseline and never notifies.
    pub async fn run(self) {
        info!(period_secs = self.period.as_secs(), "Starting group sales monitoring...");

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    /// Execute a single poll cycle: fetch, observe, notify.
    ///
    /// Fetch failures are logged and skipped; they leave the monitor state
    /// untouched and produce no notification.
    pub async fn run_cycle(&self) {
        let snapshot = match self.source.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e @ FetchError::Auth(_)) => {
                error!(error = %e, "Authentication failed - check your upstream credential");
                return;
            }
            Err(e) => {
                error!(error = %e, "Error fetching group revenue");
                return;
            }
        };

        info!(
            pending = %group_digits(snapshot.pending),
            available = %group_digits(snapshot.available),
            converted = %group_digits(snapshot.converted),
            total = %group_digits(snapshot.total()),
            "Group revenue"
        );

        let message = {
            let mut state = self.state.write().await;
            self.detector.observe(&snapshot, &mut state)
        };

        if let Some(message) = message {
            self.notifier.send(&message).await;
        }
    }
}
