//! # Salewatch
//!
//! Group sales and revenue monitor for Roblox groups.
//!
//! Salewatch polls an upstream revenue source on a fixed cadence, detects
//! monotonic revenue deltas against the last-known total, and relays them
//! to a Discord webhook. It also accepts sale events pushed directly by
//! the game server and forwards those to the same webhook, independent of
//! the polling path.
//!
//! ## Architecture
//!
//! - **Monitor**: poller + delta detector over a credential-selected source
//! - **Notify**: best-effort Discord webhook delivery
//! - **API**: REST endpoints for sale ingestion and health
//!
//! ## Quick Start
//!
//! ```bash
//! # Configure credentials in .env, then run the monitor
//! salewatch
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod notify;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::api::{create_router, AppState};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::monitor::{DeltaDetector, MonitorState, Poller, RevenueSource};
    pub use crate::notify::WebhookNotifier;
}
