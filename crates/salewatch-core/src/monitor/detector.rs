//! Revenue delta detection

use chrono::Utc;
use tracing::debug;

use crate::models::{NotificationMessage, RevenueSnapshot};
use crate::notify::group_digits;

use super::MonitorState;

/// Compares successive revenue snapshots against the last-known baseline
/// and decides whether an increase is worth notifying about.
///
/// Monotonic-increase-only: a decreased total resynchronizes the baseline
/// silently, since an upstream correction is indistinguishable from a real
/// decrease.
#[derive(Debug, Default)]
pub struct DeltaDetector;

impl DeltaDetector {
    /// Observe a new snapshot, updating the baseline and poll timestamp.
    ///
    /// Returns a notification only for a strictly positive delta after the
    /// baseline has been established; the first observation is always
    /// silent.
    pub fn observe(
        &self,
        snapshot: &RevenueSnapshot,
        state: &mut MonitorState,
    ) -> Option<NotificationMessage> {
        let total = snapshot.total();
        state.last_poll_time = snapshot.observed_at;

        if !state.initialized {
            state.last_known_total = total;
            state.initialized = true;
            debug!(total, "Baseline established");
            return None;
        }

        let message = if total > state.last_known_total {
            let delta = total - state.last_known_total;
            Some(NotificationMessage::new(
                "Group Revenue Increase.",
                "Your group earned new Robux.",
                vec![
                    (
                        "New Revenue".to_string(),
                        format!("{} Robux", group_digits(delta)),
                    ),
                    (
                        "Total Revenue".to_string(),
                        format!("{} Robux", group_digits(total)),
                    ),
                    ("Timestamp".to_string(), Utc::now().to_rfc2822()),
                ],
            ))
        } else {
            // Unchanged or decreased: resync the baseline, say nothing.
            None
        };

        state.last_known_total = total;
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(pending: u64, available: u64, converted: u64) -> RevenueSnapshot {
        RevenueSnapshot::new(pending, available, converted)
    }

    fn observe_total(detector: &DeltaDetector, state: &mut MonitorState, total: u64) -> Option<NotificationMessage> {
        detector.observe(&snapshot(0, total, 0), state)
    }

    #[test]
    fn first_observation_is_silent() {
        let detector = DeltaDetector;
        let mut state = MonitorState::new();

        assert!(observe_total(&detector, &mut state, 5000).is_none());
        assert!(state.initialized);
        assert_eq!(state.last_known_total, 5000);
    }

    #[test]
    fn positive_delta_produces_notification() {
        let detector = DeltaDetector;
        let mut state = MonitorState::new();

        observe_total(&detector, &mut state, 100);
        let message = observe_total(&detector, &mut state, 350).expect("delta expected");

        assert_eq!(message.title, "Group Revenue Increase.");
        assert_eq!(message.fields[0].0, "New Revenue");
        assert_eq!(message.fields[0].1, "250 Robux");
        assert_eq!(message.fields[1].1, "350 Robux");
        assert_eq!(state.last_known_total, 350);
    }

    #[test]
    fn unchanged_total_is_silent() {
        let detector = DeltaDetector;
        let mut state = MonitorState::new();

        observe_total(&detector, &mut state, 100);
        assert!(observe_total(&detector, &mut state, 100).is_none());
    }

    #[test]
    fn decrease_resyncs_baseline_without_alert() {
        let detector = DeltaDetector;
        let mut state = MonitorState::new();

        observe_total(&detector, &mut state, 250);
        assert!(observe_total(&detector, &mut state, 200).is_none());
        assert_eq!(state.last_known_total, 200);

        // Next increase is measured against the resynced baseline.
        let message = observe_total(&detector, &mut state, 300).expect("delta expected");
        assert_eq!(message.fields[0].1, "100 Robux");
    }

    #[test]
    fn plateaus_and_dips_alert_only_on_increase() {
        let detector = DeltaDetector;
        let mut state = MonitorState::new();

        let totals = [100u64, 100, 250, 200, 300];
        let deltas: Vec<Option<String>> = totals
            .iter()
            .map(|&t| {
                observe_total(&detector, &mut state, t).map(|m| m.fields[0].1.clone())
            })
            .collect();

        assert_eq!(
            deltas,
            vec![
                None,
                None,
                Some("150 Robux".to_string()),
                None,
                Some("100 Robux".to_string()),
            ]
        );
    }

    #[test]
    fn telescoping_sum_of_deltas() {
        let detector = DeltaDetector;
        let mut state = MonitorState::new();

        let totals = [10u64, 40, 40, 95, 95, 95, 210, 4000];
        let mut emitted = 0u64;

        for &total in &totals {
            if let Some(message) = observe_total(&detector, &mut state, total) {
                let raw = message.fields[0].1.replace(",", "").replace(" Robux", "");
                emitted += raw.parse::<u64>().unwrap();
            }
        }

        assert_eq!(emitted, 4000 - 10);
    }

    #[test]
    fn observe_updates_poll_timestamp() {
        let detector = DeltaDetector;
        let mut state = MonitorState::new();

        let snap = snapshot(1, 2, 3);
        detector.observe(&snap, &mut state);
        assert_eq!(state.last_poll_time, snap.observed_at);
    }
}
