//! Configuration management for salewatch

use serde::{Deserialize, Serialize};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Upstream (Roblox) configuration
    pub upstream: UpstreamConfig,

    /// Notification configuration
    pub notify: NotifyConfig,

    /// Polling configuration
    pub poll: PollConfig,
}

impl Config {
    /// Build a configuration from process environment variables.
    ///
    /// Absent variables disable the corresponding feature rather than
    /// failing startup; the caller decides what to warn about.
    pub fn from_env() -> Self {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        Self {
            server: ServerConfig {
                host: env("HOST").unwrap_or_else(|| ServerConfig::default().host),
                port: env("PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| ServerConfig::default().port),
            },
            upstream: UpstreamConfig {
                group_id: env("ROBLOX_GROUP_ID"),
                cookie: env("ROBLOX_COOKIE"),
                api_key: env("ROBLOX_API_KEY"),
                universe_id: env("ROBLOX_UNIVERSE_ID"),
            },
            notify: NotifyConfig {
                webhook_url: env("DISCORD_WEBHOOK_URL"),
            },
            poll: PollConfig {
                enabled: env("ENABLE_POLLING").map_or(false, |v| v == "true"),
                interval_secs: env("POLL_INTERVAL_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| PollConfig::default().interval_secs),
            },
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// HTTP API port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Upstream (Roblox) configuration
///
/// Exactly one credential kind is expected; which one is present selects
/// the revenue source variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Group whose revenue is monitored
    pub group_id: Option<String>,
    /// Session credential (.ROBLOSECURITY) for the revenue API
    pub cookie: Option<String>,
    /// Open Cloud API key for the earnings API
    pub api_key: Option<String>,
    /// Universe the API key is scoped to
    pub universe_id: Option<String>,
}

/// Notification configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Discord webhook URL; absence disables delivery
    pub webhook_url: Option<String>,
}

/// Polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Whether the revenue poller runs at all
    pub enabled: bool,
    /// Poll cadence in seconds
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 60,
        }
    }
}
