//! Revenue monitoring: polling, delta detection, and shared monitor state

mod detector;
mod poller;
mod source;

pub use detector::*;
pub use poller::*;
pub use source::*;

use chrono::{DateTime, Utc};

/// Process-wide monitor state, one instance per process.
///
/// Owned by the poller behind an `Arc<RwLock<_>>`; the health endpoint
/// reads `last_poll_time` but nothing outside the detector mutates it.
#[derive(Debug, Clone, Copy)]
pub struct MonitorState {
    /// Baseline total revenue from the last successful poll
    pub last_known_total: u64,

    /// Whether a baseline has been established yet
    pub initialized: bool,

    /// When the last successful poll completed
    pub last_poll_time: DateTime<Utc>,
}

impl MonitorState {
    /// Fresh state with no baseline established.
    pub fn new() -> Self {
        Self {
            last_known_total: 0,
            initialized: false,
            last_poll_time: Utc::now(),
        }
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}
