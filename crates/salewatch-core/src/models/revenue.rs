//! Revenue snapshot data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time aggregate revenue reading from upstream.
///
/// Immutable once constructed. The total is always derived from the three
/// breakdown components; nothing can supply it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueSnapshot {
    /// Robux pending clearance
    pub pending: u64,

    /// Robux available for use
    pub available: u64,

    /// Robux already converted
    pub converted: u64,

    /// When this snapshot was observed
    pub observed_at: DateTime<Utc>,
}

impl RevenueSnapshot {
    /// Construct a snapshot observed now.
    pub fn new(pending: u64, available: u64, converted: u64) -> Self {
        Self {
            pending,
            available,
            converted,
            observed_at: Utc::now(),
        }
    }

    /// Total revenue across all breakdown categories.
    pub fn total(&self) -> u64 {
        self.pending + self.available + self.converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_sum_of_components() {
        let snapshot = RevenueSnapshot::new(100, 250, 7);
        assert_eq!(snapshot.total(), 357);
    }

    #[test]
    fn empty_snapshot_totals_zero() {
        assert_eq!(RevenueSnapshot::new(0, 0, 0).total(), 0);
    }
}
