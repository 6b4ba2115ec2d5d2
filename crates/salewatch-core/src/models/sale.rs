//! Sale event data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player identifier as submitted by the game.
///
/// Game clients send either the numeric user id or a string form of it,
/// so both are accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerId {
    /// Numeric user id
    Number(u64),
    /// String user id
    Text(String),
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::Number(id) => write!(f, "{id}"),
            PlayerId::Text(id) => write!(f, "{id}"),
        }
    }
}

/// A single in-game purchase pushed to us by the game server.
///
/// Transient: constructed per inbound request and handed straight to the
/// notification sink, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleEvent {
    /// Display name of the purchasing player
    pub player_name: String,

    /// Identifier of the purchasing player
    pub player_id: PlayerId,

    /// Name of the purchased product
    pub product_name: String,

    /// Sale price in Robux
    pub price: u64,

    /// When the event was received
    pub received_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn player_id_accepts_number_or_string() {
        let numeric: PlayerId = serde_json::from_str("12345").unwrap();
        assert_eq!(numeric, PlayerId::Number(12345));

        let text: PlayerId = serde_json::from_str("\"12345\"").unwrap();
        assert_eq!(text, PlayerId::Text("12345".to_string()));
    }

    #[test]
    fn player_id_displays_without_quotes() {
        assert_eq!(PlayerId::Number(7).to_string(), "7");
        assert_eq!(PlayerId::Text("abc".to_string()).to_string(), "abc");
    }
}
