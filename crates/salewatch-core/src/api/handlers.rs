//! API handlers for the HTTP REST API

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Error;
use crate::models::{NotificationMessage, PlayerId, SaleEvent};
use crate::monitor::MonitorState;
use crate::notify::{group_digits, WebhookNotifier};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Notification sink shared with the poller
    pub notifier: Arc<WebhookNotifier>,
    /// Monitor state, read-only here
    pub monitor: Arc<RwLock<MonitorState>>,
    /// Process start time, for uptime reporting
    pub started_at: DateTime<Utc>,
    /// Configured group identifier, if any
    pub group_id: Option<String>,
}

/// Sale ingestion request. Every field is optional on the wire so presence
/// can be validated explicitly and rejected with our own error body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSaleRequest {
    /// Display name of the purchasing player
    pub player_name: Option<String>,
    /// Identifier of the purchasing player
    pub player_id: Option<PlayerId>,
    /// Name of the purchased product
    pub product_name: Option<String>,
    /// Sale price in Robux
    pub price: Option<u64>,
}

/// Sale ingestion response
#[derive(Serialize)]
pub struct IngestSaleResponse {
    /// Always true on acceptance
    pub success: bool,
    /// Acknowledgment text
    pub message: String,
}

/// Client-error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    /// What was wrong with the request
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Ingest a sale pushed by the game server.
///
/// Validates field presence, hands a notification to the sink, and
/// acknowledges without waiting on delivery. This path bypasses delta
/// detection entirely.
pub async fn ingest_sale(
    State(state): State<AppState>,
    Json(req): Json<IngestSaleRequest>,
) -> Result<Json<IngestSaleResponse>, Error> {
    let (Some(player_name), Some(player_id), Some(product_name), Some(price)) =
        (req.player_name, req.player_id, req.product_name, req.price)
    else {
        return Err(Error::validation("Missing required fields"));
    };

    let sale = SaleEvent {
        player_name,
        player_id,
        product_name,
        price,
        received_at: Utc::now(),
    };

    let message = NotificationMessage::new(
        "New Sale.",
        format!("{} purchased an item", sale.player_name),
        vec![
            ("Player".to_string(), sale.player_name.clone()),
            ("Product".to_string(), sale.product_name.clone()),
            (
                "Price".to_string(),
                format!("{} Robux", group_digits(sale.price)),
            ),
            ("Timestamp".to_string(), sale.received_at.to_rfc2822()),
        ],
    );

    // Fire-and-forget: the acknowledgment must not wait on delivery.
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        notifier.send(&message).await;
    });

    Ok(Json(IngestSaleResponse {
        success: true,
        message: "Sale logged".to_string(),
    }))
}

/// Health check response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "healthy"
    pub status: String,
    /// Process uptime in seconds
    pub uptime: i64,
    /// Timestamp of the last successful poll
    pub last_check: DateTime<Utc>,
    /// Configured group identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let last_check = state.monitor.read().await.last_poll_time;

    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime: (Utc::now() - state.started_at).num_seconds(),
        last_check,
        group_id: state.group_id.clone(),
    })
}
