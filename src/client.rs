//! Async client for the Majority Rules game server.
//!
//! [`MajorityRulesClient`] owns the session, the current round snapshot and
//! the poll loop. Loop-driven updates and action statuses are emitted on a
//! bounded channel ([`tokio::sync::mpsc::Receiver<GameEvent>`]) returned
//! from [`MajorityRulesClient::start`]; actions also return their outcome
//! directly.
//!
//! # Example
//!
//! ```rust,ignore
//! let gateway = HttpGateway::new(HttpGatewayConfig::new("http://127.0.0.1:8000/api"))?;
//! let (client, mut events) = MajorityRulesClient::start(gateway, ClientConfig::default());
//!
//! client.join("Alice").await?;
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         GameEvent::RoundUpdated(view) => println!("{}", view.headline()),
//!         GameEvent::PollFailed { message } => eprintln!("{message}"),
//!         _ => {}
//!     }
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::error::{MajorityRulesError, Result};
use crate::event::{emit_event, GameEvent};
use crate::gateway::Gateway;
use crate::guard::{SubmissionIntent, SubmissionKind, SubmissionOutcome};
use crate::poller::{spawn_poll_loop, PollHandle, DEFAULT_POLL_INTERVAL};
use crate::protocol::{Ack, ResultsPayload, RoundId, RoundSnapshot};
use crate::session::{validate_display_name, Session};
use crate::sync::SyncState;
use crate::view::RoundView;

/// Default capacity of the bounded event channel.
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

// ── Configuration ───────────────────────────────────────────────────

/// Configuration for a [`MajorityRulesClient`].
///
/// # Example
///
/// ```
/// use majority_rules_client::client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_poll_interval(Duration::from_millis(500))
///     .with_event_channel_capacity(64);
/// assert_eq!(config.poll_interval, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Period of the state poll. Defaults to **2000 ms**. Zero is clamped to 1 ms.
    pub poll_interval: Duration,
    /// Capacity of the bounded event channel.
    ///
    /// When the consumer cannot keep up, events are dropped (with a warning
    /// logged) so the poll loop never blocks.
    ///
    /// Defaults to **256**. Values below 1 are clamped to 1.
    pub event_channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Set the poll period.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Set the capacity of the bounded event channel.
    #[must_use]
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity.max(1);
        self
    }
}

// ── Client handle ───────────────────────────────────────────────────

/// Participant-side client.
///
/// Idle until [`join`](Self::join) succeeds, then Active: a poll loop keeps
/// the current snapshot fresh until the client is dropped or
/// [`stop_polling`](Self::stop_polling) is called.
pub struct MajorityRulesClient<G: Gateway> {
    gateway: Arc<G>,
    sync: Arc<SyncState>,
    /// Set once by a successful join.
    session: Mutex<Option<Session>>,
    /// At most one live poll loop.
    poller: Mutex<Option<PollHandle>>,
    event_tx: mpsc::Sender<GameEvent>,
    poll_interval: Duration,
}

impl<G: Gateway> MajorityRulesClient<G> {
    /// Create an idle client and its event receiver.
    ///
    /// No request is made until [`join`](Self::join) is called.
    #[must_use = "the event receiver must be used to receive events"]
    pub fn start(gateway: G, config: ClientConfig) -> (Self, mpsc::Receiver<GameEvent>) {
        // Clamp capacity to at least 1 (tokio panics on 0).
        let capacity = config.event_channel_capacity.max(1);
        let (event_tx, event_rx) = mpsc::channel::<GameEvent>(capacity);

        let client = Self {
            gateway: Arc::new(gateway),
            sync: Arc::new(SyncState::new()),
            session: Mutex::new(None),
            poller: Mutex::new(None),
            event_tx,
            poll_interval: config.poll_interval.max(Duration::from_millis(1)),
        };
        (client, event_rx)
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Join the game under `name` and start polling.
    ///
    /// The name is trimmed and validated before any request is sent.
    ///
    /// # Errors
    ///
    /// - [`MajorityRulesError::Validation`] for an empty name (no request made).
    /// - [`MajorityRulesError::AlreadyJoined`] if a session already exists (no request made).
    /// - Whatever the gateway returns for a rejected or failed join.
    pub async fn join(&self, name: &str) -> Result<Session> {
        let result = self.join_inner(name).await;
        match &result {
            Ok(session) => emit_event(
                &self.event_tx,
                GameEvent::Joined {
                    session: session.clone(),
                },
            ),
            Err(e) => {
                warn!(error = %e, "join failed");
                emit_event(
                    &self.event_tx,
                    GameEvent::JoinFailed {
                        message: e.status_message(),
                    },
                );
            }
        }
        if result.is_ok() {
            self.start_polling().await;
        }
        result
    }

    async fn join_inner(&self, name: &str) -> Result<Session> {
        let name = validate_display_name(name)?;

        // Held across the request so concurrent joins cannot both succeed.
        let mut slot = self.session.lock().await;
        if let Some(existing) = slot.as_ref() {
            return Err(MajorityRulesError::AlreadyJoined(
                existing.display_name().to_owned(),
            ));
        }

        let session = self.gateway.join(name).await?;
        info!(
            participant_id = %session.participant_id(),
            name = %session.display_name(),
            "joined game"
        );
        *slot = Some(session.clone());
        Ok(session)
    }

    /// The session established by [`join`](Self::join), if any.
    pub async fn session(&self) -> Option<Session> {
        self.session.lock().await.clone()
    }

    // ── Polling ─────────────────────────────────────────────────────

    /// Start the poll loop, cancelling any loop that is already running.
    ///
    /// The prior loop is stopped before the new one is spawned, so at most
    /// one poll loop is ever live.
    pub async fn start_polling(&self) {
        let mut slot = self.poller.lock().await;
        if let Some(mut prior) = slot.take() {
            debug!("cancelling previous poll loop before restart");
            prior.stop();
        }
        *slot = Some(spawn_poll_loop(
            Arc::clone(&self.gateway),
            Arc::clone(&self.sync),
            self.event_tx.clone(),
            self.poll_interval,
        ));
    }

    /// Stop the poll loop, if one is running.
    pub async fn stop_polling(&self) {
        if let Some(mut handle) = self.poller.lock().await.take() {
            handle.stop();
        }
    }

    /// Returns `true` while a poll loop is running.
    pub async fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .await
            .as_ref()
            .is_some_and(PollHandle::is_running)
    }

    /// Ticks fired by the current poll loop, or 0 when idle.
    pub async fn poll_ticks(&self) -> u64 {
        self.poller.lock().await.as_ref().map_or(0, PollHandle::ticks)
    }

    // ── Round state ─────────────────────────────────────────────────

    /// The latest fetched snapshot.
    pub async fn snapshot(&self) -> Option<RoundSnapshot> {
        self.sync.snapshot().await
    }

    /// The round identifier of the latest snapshot.
    pub async fn current_round_id(&self) -> Option<RoundId> {
        self.sync.round_id().await
    }

    /// The view of the latest snapshot.
    pub async fn view(&self) -> Option<RoundView> {
        self.sync.view().await
    }

    // ── Submissions ─────────────────────────────────────────────────

    /// Capture an intent bound to the round known right now.
    ///
    /// # Errors
    ///
    /// - [`MajorityRulesError::Validation`] if the trimmed text is empty.
    /// - [`MajorityRulesError::NoRound`] if no snapshot has been fetched yet.
    pub async fn capture(&self, kind: SubmissionKind, text: &str) -> Result<SubmissionIntent> {
        let round = self.sync.round_id().await;
        SubmissionIntent::capture(kind, text, round)
    }

    /// Send a previously captured intent for the round it was captured in.
    pub async fn dispatch(&self, intent: SubmissionIntent) -> SubmissionOutcome {
        let result = self.send_intent(&intent).await;
        self.finish_submission(intent.kind(), Some(intent.round_id()), intent.text(), result)
    }

    /// Capture and send an answer.
    pub async fn submit_answer(&self, text: &str) -> SubmissionOutcome {
        self.submit(SubmissionKind::Answer, text).await
    }

    /// Capture and send a guess.
    pub async fn submit_guess(&self, text: &str) -> SubmissionOutcome {
        self.submit(SubmissionKind::Guess, text).await
    }

    /// Capture and send a submission. Failures are reported in the outcome;
    /// the original input is retained for retry.
    pub async fn submit(&self, kind: SubmissionKind, text: &str) -> SubmissionOutcome {
        let (round_id, result) = match self.capture(kind, text).await {
            Ok(intent) => (Some(intent.round_id()), self.send_intent(&intent).await),
            Err(e) => (None, Err(e)),
        };
        self.finish_submission(kind, round_id, text, result)
    }

    async fn send_intent(&self, intent: &SubmissionIntent) -> Result<Ack> {
        let session = self.session().await.ok_or(MajorityRulesError::NotJoined)?;
        debug!(kind = %intent.kind(), round_id = intent.round_id(), "sending submission");
        self.gateway.submit(intent, &session).await
    }

    fn finish_submission(
        &self,
        kind: SubmissionKind,
        round_id: Option<RoundId>,
        input: &str,
        result: Result<Ack>,
    ) -> SubmissionOutcome {
        match &result {
            Ok(_) => info!(%kind, ?round_id, "submission accepted"),
            Err(e) if e.is_local() => debug!(%kind, ?round_id, error = %e, "submission not sent"),
            Err(e) => warn!(%kind, ?round_id, error = %e, "submission failed"),
        }
        let outcome = SubmissionOutcome::new(kind, input, result);
        emit_event(
            &self.event_tx,
            GameEvent::SubmissionStatus {
                kind,
                round_id,
                status: outcome.status(),
            },
        );
        outcome
    }

    // ── Results ─────────────────────────────────────────────────────

    /// Fetch results for the round that is current at call time.
    ///
    /// # Errors
    ///
    /// [`MajorityRulesError::NoRound`] before the first snapshot, otherwise
    /// whatever [`fetch_results_for`](Self::fetch_results_for) returns.
    pub async fn fetch_results(&self) -> Result<ResultsPayload> {
        match self.sync.round_id().await {
            Some(round_id) => self.fetch_results_for(round_id).await,
            None => {
                let err = MajorityRulesError::NoRound;
                self.report_results_error(None, &err);
                Err(err)
            }
        }
    }

    /// Fetch results for a specific round. Nothing is cached.
    ///
    /// # Errors
    ///
    /// The server's `{error}` message, or `"Results not available yet"`.
    pub async fn fetch_results_for(&self, round_id: RoundId) -> Result<ResultsPayload> {
        match self.gateway.fetch_results(round_id).await {
            Ok(payload) => {
                debug!(round_id, "results fetched");
                emit_event(
                    &self.event_tx,
                    GameEvent::ResultsReady {
                        round_id,
                        payload: payload.clone(),
                    },
                );
                Ok(payload)
            }
            Err(e) => {
                self.report_results_error(Some(round_id), &e);
                Err(e)
            }
        }
    }

    fn report_results_error(&self, round_id: Option<RoundId>, err: &MajorityRulesError) {
        if err.is_local() {
            debug!(?round_id, error = %err, "results not requested");
        } else {
            warn!(?round_id, error = %err, "results unavailable");
        }
        emit_event(
            &self.event_tx,
            GameEvent::ResultsUnavailable {
                round_id,
                message: err.status_message(),
            },
        );
    }
}

impl<G: Gateway> std::fmt::Debug for MajorityRulesClient<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MajorityRulesClient")
            .field("poll_interval", &self.poll_interval)
            .field("event_channel_closed", &self.event_tx.is_closed())
            .finish_non_exhaustive()
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::protocol::Phase;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Accepts every join and serves a fixed ANSWER snapshot.
    #[derive(Default)]
    struct FixedGateway {
        joins: AtomicUsize,
    }

    #[async_trait]
    impl Gateway for FixedGateway {
        async fn join(&self, name: &str) -> Result<Session> {
            self.joins.fetch_add(1, Ordering::SeqCst);
            Ok(Session::new("p-1", name))
        }

        async fn fetch_state(&self) -> Result<RoundSnapshot> {
            Ok(RoundSnapshot {
                phase: Phase::Answer,
                round_id: Some(1),
                round_total: Some(3),
                prompt: Some("Favourite colour?".into()),
            })
        }

        async fn submit(&self, _intent: &SubmissionIntent, _session: &Session) -> Result<Ack> {
            Ok(Ack::default())
        }

        async fn fetch_results(&self, _round_id: RoundId) -> Result<ResultsPayload> {
            Err(MajorityRulesError::Transport("Results not available yet".into()))
        }
    }

    #[test]
    fn config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(2000));
        assert_eq!(config.event_channel_capacity, 256);
    }

    #[test]
    fn config_builder_clamps() {
        let config = ClientConfig::default()
            .with_poll_interval(Duration::ZERO)
            .with_event_channel_capacity(0);
        assert_eq!(config.poll_interval, Duration::from_millis(1));
        assert_eq!(config.event_channel_capacity, 1);
    }

    #[tokio::test]
    async fn idle_client_does_not_poll() {
        let (client, _events) =
            MajorityRulesClient::start(FixedGateway::default(), ClientConfig::default());
        assert!(!client.is_polling().await);
        assert_eq!(client.poll_ticks().await, 0);
        assert!(client.session().await.is_none());
    }

    #[tokio::test]
    async fn join_then_first_event_is_joined() {
        let (client, mut events) =
            MajorityRulesClient::start(FixedGateway::default(), ClientConfig::default());
        let session = client.join(" Alice ").await.unwrap();
        assert_eq!(session.display_name(), "Alice");

        let ev = events.recv().await.unwrap();
        assert!(matches!(ev, GameEvent::Joined { .. }));
        let ev = events.recv().await.unwrap();
        let GameEvent::RoundUpdated(view) = ev else {
            panic!("expected RoundUpdated, got {ev:?}");
        };
        assert_eq!(view.prompt, "Favourite colour?");
        assert!(client.is_polling().await);
    }

    #[tokio::test]
    async fn second_join_is_rejected_without_request() {
        let (client, _events) =
            MajorityRulesClient::start(FixedGateway::default(), ClientConfig::default());
        client.join("Alice").await.unwrap();
        let err = client.join("Bob").await.unwrap_err();
        assert!(matches!(err, MajorityRulesError::AlreadyJoined(ref n) if n == "Alice"));
        assert_eq!(client.gateway.joins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn submit_before_join_is_not_sent() {
        let (client, _events) =
            MajorityRulesClient::start(FixedGateway::default(), ClientConfig::default());
        client.sync.apply(FixedGateway::default().fetch_state().await.unwrap()).await;
        let outcome = client.submit_answer("red").await;
        assert!(matches!(outcome.result(), Err(MajorityRulesError::NotJoined)));
        assert_eq!(outcome.retained_input(), "red");
    }

    #[tokio::test]
    async fn debug_impl_for_client() {
        let (client, _events) =
            MajorityRulesClient::start(FixedGateway::default(), ClientConfig::default());
        let debug = format!("{client:?}");
        assert!(debug.contains("MajorityRulesClient"));
    }
}
