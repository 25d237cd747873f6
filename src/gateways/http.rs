//! HTTP gateway implementation using `reqwest`.
//!
//! [`HttpGateway`] maps each [`Gateway`] operation onto one JSON request
//! against the server's REST API. Endpoint paths (`join`, `state`,
//! `answer`, `guess`, `results`) are appended to the configured base URL,
//! so a deployment serving them under `/api` is configured with a base URL
//! ending in `/api`.
//!
//! # Feature gate
//!
//! This module is only available when the `gateway-http` feature is enabled
//! (it is enabled by default).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{MajorityRulesError, Result};
use crate::gateway::Gateway;
use crate::guard::SubmissionIntent;
use crate::protocol::{
    Ack, ErrorBody, JoinRequest, JoinResponse, ResultsPayload, RoundId, RoundSnapshot,
};
use crate::session::Session;

/// Fallback when join fails without a server message.
pub const JOIN_FAILED: &str = "Join failed";

/// Fallback when a results fetch fails without a server message.
pub const RESULTS_UNAVAILABLE: &str = "Results not available yet";

/// Header that suppresses the ngrok browser interstitial on tunnelled servers.
const NGROK_SKIP_WARNING: &str = "ngrok-skip-browser-warning";

// ── Configuration ───────────────────────────────────────────────────

/// Configuration for an [`HttpGateway`].
///
/// # Example
///
/// ```
/// use majority_rules_client::HttpGatewayConfig;
///
/// let config = HttpGatewayConfig::new("https://example.test/api/")
///     .with_header("x-table", "7");
/// assert_eq!(config.base_url, "https://example.test/api");
/// ```
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Base URL the endpoint paths are appended to. Trailing slashes are trimmed.
    pub base_url: String,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
    /// `User-Agent` header value. Defaults to `majority-rules-client/<version>`.
    pub user_agent: String,
    /// Whether to honour `HTTP_PROXY` / `HTTPS_PROXY` from the environment.
    /// Defaults to `true`.
    pub use_system_proxy: bool,
}

impl HttpGatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            headers: Vec::new(),
            user_agent: concat!("majority-rules-client/", env!("CARGO_PKG_VERSION")).to_owned(),
            use_system_proxy: true,
        }
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Send `ngrok-skip-browser-warning: true` with every request.
    #[must_use]
    pub fn with_ngrok_skip_warning(self) -> Self {
        self.with_header(NGROK_SKIP_WARNING, "true")
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Connect directly, ignoring proxy settings from the environment.
    #[must_use]
    pub fn without_system_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                MajorityRulesError::Validation(format!("invalid header name {name:?}: {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                MajorityRulesError::Validation(format!("invalid header value for {name}: {e}"))
            })?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

// ── Gateway ─────────────────────────────────────────────────────────

/// A [`Gateway`] backed by a shared `reqwest` connection pool.
///
/// Requests carry no timeout of their own; the transport defaults apply.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    http: reqwest::Client,
}

impl HttpGateway {
    /// Build a gateway from its configuration.
    ///
    /// # Errors
    ///
    /// - [`MajorityRulesError::Validation`] if a configured header is not a valid HTTP header.
    /// - [`MajorityRulesError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: HttpGatewayConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .default_headers(config.header_map()?)
            .user_agent(config.user_agent.as_str());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build().map_err(transport_error)?;
        Ok(Self {
            base_url: config.base_url,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn join(&self, name: &str) -> Result<Session> {
        let url = self.url("join");
        debug!(url = %url, "POST join");
        let resp = self
            .http
            .post(&url)
            .json(&JoinRequest {
                name: name.to_owned(),
            })
            .send()
            .await
            .map_err(transport_error)?;
        let joined: JoinResponse = read_json(resp, JOIN_FAILED).await?;
        Ok(Session::from(joined))
    }

    async fn fetch_state(&self) -> Result<RoundSnapshot> {
        let url = self.url("state");
        let resp = self.http.get(&url).send().await.map_err(transport_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(MajorityRulesError::Transport(format!(
                "State request failed: {}",
                status.as_u16()
            )));
        }
        let body = resp.text().await.map_err(transport_error)?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn submit(&self, intent: &SubmissionIntent, session: &Session) -> Result<Ack> {
        let url = self.url(intent.kind().endpoint());
        debug!(url = %url, round_id = intent.round_id(), "POST submission");
        let resp = self
            .http
            .post(&url)
            .json(&intent.to_request(session))
            .send()
            .await
            .map_err(transport_error)?;
        read_json(resp, intent.kind().fallback_error()).await
    }

    async fn fetch_results(&self, round_id: RoundId) -> Result<ResultsPayload> {
        let url = self.url("results");
        debug!(url = %url, round_id, "GET results");
        let resp = self
            .http
            .get(&url)
            .query(&[("round_id", round_id)])
            .send()
            .await
            .map_err(transport_error)?;
        read_json(resp, RESULTS_UNAVAILABLE).await
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn transport_error(e: reqwest::Error) -> MajorityRulesError {
    MajorityRulesError::Transport(e.to_string())
}

/// Decode a success body, or turn a non-success response into the server's
/// `{error}` message (falling back to `fallback`).
async fn read_json<T: DeserializeOwned>(resp: Response, fallback: &str) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await.map_err(transport_error)?;
    if !status.is_success() {
        return Err(status_error(status, &body, fallback));
    }
    // An empty acknowledgement decodes as JSON null.
    let body = if body.trim().is_empty() { "null" } else { body.as_str() };
    Ok(serde_json::from_str(body)?)
}

fn status_error(status: StatusCode, body: &str, fallback: &str) -> MajorityRulesError {
    match ErrorBody::message_from(body) {
        Some(message) => MajorityRulesError::Server {
            status: status.as_u16(),
            message,
        },
        None => MajorityRulesError::Transport(fallback.to_owned()),
    }
}
