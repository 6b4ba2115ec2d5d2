//! Notification message data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A structured alert destined for the notification sink.
///
/// Built by either the polling path or the ingestion path, consumed once
/// by the webhook notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Alert title
    pub title: String,

    /// Alert body text
    pub description: String,

    /// Ordered label/value pairs rendered as inline fields
    pub fields: Vec<(String, String)>,

    /// When the message was emitted
    pub emitted_at: DateTime<Utc>,
}

impl NotificationMessage {
    /// Construct a message emitted now.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<(String, String)>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields,
            emitted_at: Utc::now(),
        }
    }
}
