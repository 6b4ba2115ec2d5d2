//! Upstream revenue sources

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::models::RevenueSnapshot;

const GROUPS_API_BASE: &str = "https://groups.roblox.com";
const OPEN_CLOUD_API_BASE: &str = "https://apis.roblox.com";

/// Errors from a single fetch attempt. All are non-fatal; the poll cycle
/// that hit one is skipped.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Upstream rejected the credential (401/403)
    #[error("authentication failed with status {0}")]
    Auth(u16),

    /// Upstream returned some other non-success status
    #[error("upstream returned status {0}")]
    Status(u16),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Upstream revenue source, selected once at startup by which credential
/// is configured. At most one variant is active per process.
pub enum RevenueSource {
    /// Authenticated-session source against the group revenue endpoint
    Session {
        /// HTTP client
        client: Client,
        /// Group whose revenue is fetched
        group_id: String,
        /// Session cookie value
        cookie: String,
        /// API base URL
        base_url: String,
    },
    /// API-key source against the Open Cloud earnings endpoint
    ApiKey {
        /// HTTP client
        client: Client,
        /// Open Cloud API key
        api_key: String,
        /// Universe the key is scoped to
        universe_id: String,
        /// API base URL
        base_url: String,
    },
}

impl RevenueSource {
    /// Select a source from configuration.
    ///
    /// The session credential takes precedence over the API key. Returns
    /// `None` (with warnings) when no usable credential is configured; the
    /// caller must not start the poller in that case.
    pub fn from_config(upstream: &UpstreamConfig) -> Option<Self> {
        let Some(group_id) = upstream.group_id.clone() else {
            warn!("ROBLOX_GROUP_ID not configured");
            return None;
        };

        if let Some(cookie) = upstream.cookie.clone() {
            return Some(Self::session(group_id, cookie, GROUPS_API_BASE));
        }

        if let Some(api_key) = upstream.api_key.clone() {
            let Some(universe_id) = upstream.universe_id.clone() else {
                warn!("ROBLOX_UNIVERSE_ID not configured");
                return None;
            };
            return Some(Self::api_key(api_key, universe_id, OPEN_CLOUD_API_BASE));
        }

        warn!("No authentication configured");
        warn!("To enable monitoring, set one of these in .env:");
        warn!("  - ROBLOX_COOKIE (your .ROBLOSECURITY cookie)");
        warn!("  - ROBLOX_API_KEY (your Open Cloud API key)");
        None
    }

    /// Build a session-credential source.
    pub fn session(
        group_id: impl Into<String>,
        cookie: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self::Session {
            client: http_client(),
            group_id: group_id.into(),
            cookie: cookie.into(),
            base_url: base_url.into(),
        }
    }

    /// Build an API-key source.
    pub fn api_key(
        api_key: impl Into<String>,
        universe_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self::ApiKey {
            client: http_client(),
            api_key: api_key.into(),
            universe_id: universe_id.into(),
            base_url: base_url.into(),
        }
    }

    /// Human-readable name of the active fetch method.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Session { .. } => "Revenue API (authenticated)",
            Self::ApiKey { .. } => "Open Cloud API",
        }
    }

    /// Fetch the current revenue snapshot from upstream.
    pub async fn fetch(&self) -> Result<RevenueSnapshot, FetchError> {
        match self {
            Self::Session {
                client,
                group_id,
                cookie,
                base_url,
            } => {
                let url = format!("{base_url}/v1/groups/{group_id}/revenue");
                let response = client
                    .get(&url)
                    .header("Cookie", format!(".ROBLOSECURITY={cookie}"))
                    .header("User-Agent", "Mozilla/5.0")
                    .send()
                    .await?;

                let body: GroupRevenueResponse = decode(response).await?;
                let breakdown = body.revenue_by_type;

                Ok(RevenueSnapshot::new(
                    breakdown.pending,
                    breakdown.available,
                    breakdown.converted,
                ))
            }
            Self::ApiKey {
                client,
                api_key,
                universe_id,
                base_url,
            } => {
                debug!(%universe_id, "Fetching earnings via Open Cloud");
                let url = format!("{base_url}/developer-exchange/v1/earnings");
                let response = client.get(&url).header("x-api-key", api_key).send().await?;

                // The earnings figure is a running total; treat it as the
                // available balance so both variants feed one detector.
                let body: EarningsResponse = decode(response).await?;
                Ok(RevenueSnapshot::new(0, body.amount, 0))
            }
        }
    }
}

fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Triage the response status, then decode the body.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, FetchError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(FetchError::Auth(status.as_u16()));
    }
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// Group revenue endpoint response. Missing breakdown categories are
/// treated as zero rather than an error.
#[derive(Debug, Deserialize)]
struct GroupRevenueResponse {
    #[serde(rename = "revenueByType", default)]
    revenue_by_type: RevenueByType,
}

#[derive(Debug, Default, Deserialize)]
struct RevenueByType {
    #[serde(rename = "Pending", default)]
    pending: u64,
    #[serde(rename = "Available", default)]
    available: u64,
    #[serde(rename = "Converted", default)]
    converted: u64,
}

/// Open Cloud earnings endpoint response.
#[derive(Debug, Default, Deserialize)]
struct EarningsResponse {
    #[serde(default)]
    amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn session_source_parses_breakdown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/groups/4406622/revenue"))
            .and(header("Cookie", ".ROBLOSECURITY=secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "revenueByType": {"Pending": 100, "Available": 250, "Converted": 7}
            })))
            .mount(&server)
            .await;

        let source = RevenueSource::session("4406622", "secret", server.uri());
        let snapshot = source.fetch().await.unwrap();

        assert_eq!(snapshot.pending, 100);
        assert_eq!(snapshot.available, 250);
        assert_eq!(snapshot.converted, 7);
        assert_eq!(snapshot.total(), 357);
    }

    #[tokio::test]
    async fn missing_breakdown_categories_map_to_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "revenueByType": {"Available": 42}
            })))
            .mount(&server)
            .await;

        let source = RevenueSource::session("1", "secret", server.uri());
        let snapshot = source.fetch().await.unwrap();

        assert_eq!(snapshot.total(), 42);
    }

    #[tokio::test]
    async fn forbidden_is_an_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let source = RevenueSource::session("1", "expired", server.uri());
        match source.fetch().await {
            Err(FetchError::Auth(status)) => assert_eq!(status, 403),
            other => panic!("expected auth failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn api_key_source_normalizes_earnings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/developer-exchange/v1/earnings"))
            .and(header("x-api-key", "k123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"amount": 90000})),
            )
            .mount(&server)
            .await;

        let source = RevenueSource::api_key("k123", "555", server.uri());
        let snapshot = source.fetch().await.unwrap();

        assert_eq!(snapshot.available, 90000);
        assert_eq!(snapshot.pending, 0);
        assert_eq!(snapshot.total(), 90000);
    }

    #[tokio::test]
    async fn invalid_api_key_is_an_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let source = RevenueSource::api_key("bad", "555", server.uri());
        assert!(matches!(source.fetch().await, Err(FetchError::Auth(401))));
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let source = RevenueSource::session("1", "secret", server.uri());
        assert!(matches!(
            source.fetch().await,
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn config_selection_prefers_session_credential() {
        let upstream = UpstreamConfig {
            group_id: Some("1".to_string()),
            cookie: Some("c".to_string()),
            api_key: Some("k".to_string()),
            universe_id: Some("u".to_string()),
        };

        let source = RevenueSource::from_config(&upstream).unwrap();
        assert_eq!(source.describe(), "Revenue API (authenticated)");
    }

    #[test]
    fn config_without_credentials_yields_no_source() {
        let upstream = UpstreamConfig {
            group_id: Some("1".to_string()),
            ..Default::default()
        };
        assert!(RevenueSource::from_config(&upstream).is_none());

        // API key without a universe id is equally unusable.
        let upstream = UpstreamConfig {
            group_id: Some("1".to_string()),
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        assert!(RevenueSource::from_config(&upstream).is_none());
    }
}
