//! Notification delivery to the configured Discord webhook

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::models::NotificationMessage;

/// Embed accent color used for every notification (Discord blurple-blue).
const EMBED_COLOR: u32 = 3_447_003;

/// Footer text identifying the monitor as the source of the alert.
const FOOTER_TEXT: &str = "Roblox Group Sales Monitor";

/// Delivery errors
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Webhook responded with a non-success status
    #[error("webhook returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Sends notifications to a Discord webhook.
///
/// Delivery is best-effort and fire-and-forget: [`WebhookNotifier::send`]
/// never surfaces a failure to the caller, it logs and returns.
pub struct WebhookNotifier {
    client: Client,
    webhook_url: Option<String>,
}

impl WebhookNotifier {
    /// Create a notifier targeting the given webhook URL.
    ///
    /// `None` leaves the notifier inert; every send logs a warning instead
    /// of delivering.
    pub fn new(webhook_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            webhook_url,
        }
    }

    /// Whether a webhook URL is configured.
    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Deliver a message, swallowing any failure.
    pub async fn send(&self, message: &NotificationMessage) {
        let Some(url) = self.webhook_url.as_deref() else {
            warn!("Discord webhook not configured, dropping notification");
            return;
        };

        match self.deliver(url, message).await {
            Ok(()) => info!(title = %message.title, "Notified Discord"),
            Err(e) => error!(error = %e, title = %message.title, "Failed to send Discord notification"),
        }
    }

    /// The fallible inner delivery, separated so tests can assert on outcomes.
    async fn deliver(
        &self,
        url: &str,
        message: &NotificationMessage,
    ) -> Result<(), NotificationError> {
        let payload = WebhookPayload {
            embeds: vec![Embed {
                title: message.title.clone(),
                description: message.description.clone(),
                color: EMBED_COLOR,
                fields: message
                    .fields
                    .iter()
                    .map(|(name, value)| EmbedField {
                        name: name.clone(),
                        value: value.clone(),
                        inline: true,
                    })
                    .collect(),
                footer: EmbedFooter {
                    text: FOOTER_TEXT.to_string(),
                },
                timestamp: message.emitted_at.to_rfc3339(),
            }],
        };

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected { status, body });
        }

        Ok(())
    }
}

/// Render an amount with thousands separators, e.g. `1234567` -> `1,234,567`.
pub fn group_digits(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;

    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

// Discord webhook payload types
#[derive(Debug, Serialize)]
struct WebhookPayload {
    embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    description: String,
    color: u32,
    fields: Vec<EmbedField>,
    footer: EmbedFooter,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: String,
    value: String,
    inline: bool,
}

#[derive(Debug, Serialize)]
struct EmbedFooter {
    text: String,
}
