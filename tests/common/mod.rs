#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing,
    dead_code
)]
//! Shared test utilities for Majority Rules client integration tests.
//!
//! Provides a scripted [`MockGateway`] that records every call, plus helpers
//! for building snapshots and draining the event channel.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use majority_rules_client::error::Result;
use majority_rules_client::protocol::{Ack, ResultsPayload, RoundId};
use majority_rules_client::{
    GameEvent, Gateway, MajorityRulesError, Phase, RoundSnapshot, RoundView, Session,
    SubmissionIntent, SubmissionKind,
};
use tokio::sync::mpsc;

// ── MockGateway ─────────────────────────────────────────────────────

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Join(String),
    FetchState,
    Submit {
        kind: SubmissionKind,
        round_id: RoundId,
        text: String,
        participant: String,
    },
    FetchResults(RoundId),
}

/// A gateway whose replies are scripted per operation.
///
/// - `join` echoes the name with participant id `"p-1"` unless a failure is scripted.
/// - `fetch_state` pops scripted replies; once exhausted it fails with
///   `"server down"`.
/// - `submit` pops scripted replies, defaulting to an empty ack.
/// - `fetch_results` pops scripted replies, defaulting to
///   `"Results not available yet"`.
#[derive(Default)]
pub struct MockGateway {
    join_error: StdMutex<Option<MajorityRulesError>>,
    states: StdMutex<VecDeque<Result<RoundSnapshot>>>,
    submits: StdMutex<VecDeque<Result<Ack>>>,
    results: StdMutex<VecDeque<Result<ResultsPayload>>>,
    state_delay: StdMutex<Duration>,
    submit_delay: StdMutex<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    submits_in_flight: AtomicUsize,
    max_submits_in_flight: AtomicUsize,
    calls: StdMutex<Vec<Call>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_join(&self, err: MajorityRulesError) {
        *self.join_error.lock().unwrap() = Some(err);
    }

    pub fn script_state(&self, reply: Result<RoundSnapshot>) {
        self.states.lock().unwrap().push_back(reply);
    }

    pub fn script_states(&self, replies: impl IntoIterator<Item = Result<RoundSnapshot>>) {
        self.states.lock().unwrap().extend(replies);
    }

    pub fn script_submit(&self, reply: Result<Ack>) {
        self.submits.lock().unwrap().push_back(reply);
    }

    pub fn script_results(&self, reply: Result<ResultsPayload>) {
        self.results.lock().unwrap().push_back(reply);
    }

    /// Make every state fetch take `delay` before answering.
    pub fn set_state_delay(&self, delay: Duration) {
        *self.state_delay.lock().unwrap() = delay;
    }

    /// Make every submission take `delay` before answering.
    pub fn set_submit_delay(&self, delay: Duration) {
        *self.submit_delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn state_fetches(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::FetchState))
            .count()
    }

    pub fn submissions(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Submit { .. }))
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// State fetches currently waiting on their reply.
    pub fn state_in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_submits_in_flight(&self) -> usize {
        self.max_submits_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn join(&self, name: &str) -> Result<Session> {
        self.record(Call::Join(name.to_owned()));
        match self.join_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(Session::new("p-1", name)),
        }
    }

    async fn fetch_state(&self) -> Result<RoundSnapshot> {
        self.record(Call::FetchState);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.state_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(MajorityRulesError::Transport("server down".into())))
    }

    async fn submit(&self, intent: &SubmissionIntent, session: &Session) -> Result<Ack> {
        self.record(Call::Submit {
            kind: intent.kind(),
            round_id: intent.round_id(),
            text: intent.text().to_owned(),
            participant: session.participant_id().to_string(),
        });
        let now = self.submits_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_submits_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.submit_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.submits_in_flight.fetch_sub(1, Ordering::SeqCst);
        self.submits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Ack::default()))
    }

    async fn fetch_results(&self, round_id: RoundId) -> Result<ResultsPayload> {
        self.record(Call::FetchResults(round_id));
        self.results.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(MajorityRulesError::Transport(
                "Results not available yet".into(),
            ))
        })
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// A snapshot in `phase` for `round_id` of 5, with a prompt.
pub fn snapshot(phase: &str, round_id: RoundId) -> RoundSnapshot {
    RoundSnapshot {
        phase: Phase::from(phase),
        round_id: Some(round_id),
        round_total: Some(5),
        prompt: Some(format!("Prompt for round {round_id}")),
    }
}

pub fn server_error(status: u16, message: &str) -> MajorityRulesError {
    MajorityRulesError::Server {
        status,
        message: message.into(),
    }
}

/// Receive events until the next `RoundUpdated`, returning its view.
pub async fn next_round(rx: &mut mpsc::Receiver<GameEvent>) -> RoundView {
    loop {
        match rx.recv().await.expect("event channel closed") {
            GameEvent::RoundUpdated(view) => return view,
            _ => continue,
        }
    }
}

/// Receive events until the next `PollFailed`, returning its message.
pub async fn next_poll_failure(rx: &mut mpsc::Receiver<GameEvent>) -> String {
    loop {
        match rx.recv().await.expect("event channel closed") {
            GameEvent::PollFailed { message } => return message,
            _ => continue,
        }
    }
}
