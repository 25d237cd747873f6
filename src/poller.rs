//! Polling loop: the fixed-period fetch of authoritative round state.
//!
//! [`spawn_poll_loop`] starts a background task that fetches state once
//! immediately and then every period, feeding each snapshot through the
//! [`SyncState`] and out on the event channel. A failed tick is logged and
//! reported; it never stops later ticks.
//!
//! Overlap policy: fetches run inline in the loop task and missed ticks are
//! skipped, so at most one state request is in flight per loop. A slow
//! response delays the next tick instead of stacking concurrent requests.
//!
//! The returned [`PollHandle`] is the only way to cancel the loop. Dropping
//! the handle cancels it too.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::event::{emit_event, GameEvent};
use crate::gateway::Gateway;
use crate::sync::SyncState;

/// Fixed polling period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Handle to a running poll loop.
#[derive(Debug)]
pub struct PollHandle {
    task: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl PollHandle {
    /// Cancel the loop. Any in-flight state request is dropped at its next
    /// suspension point. Idempotent.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("stopping poll loop");
            task.abort();
        }
    }

    /// Returns `true` until [`stop`](Self::stop) is called or the task ends.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Number of ticks fired so far, successful or not.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start a poll loop on the current tokio runtime.
///
/// A zero `period` is clamped to one millisecond.
pub fn spawn_poll_loop<G: Gateway>(
    gateway: Arc<G>,
    state: Arc<SyncState>,
    event_tx: mpsc::Sender<GameEvent>,
    period: Duration,
) -> PollHandle {
    let ticks = Arc::new(AtomicU64::new(0));
    let period = period.max(Duration::from_millis(1));
    let task = tokio::spawn(poll_loop(
        gateway,
        state,
        event_tx,
        period,
        Arc::clone(&ticks),
    ));
    PollHandle {
        task: Some(task),
        ticks,
    }
}

async fn poll_loop<G: Gateway>(
    gateway: Arc<G>,
    state: Arc<SyncState>,
    event_tx: mpsc::Sender<GameEvent>,
    period: Duration,
    ticks: Arc<AtomicU64>,
) {
    debug!(?period, "poll loop started");

    // The first tick of an interval completes immediately.
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        ticks.fetch_add(1, Ordering::AcqRel);
        poll_once(&*gateway, &state, &event_tx).await;
    }
}

/// One fetch-and-publish cycle. Never fails: errors become a
/// [`GameEvent::PollFailed`].
pub async fn poll_once<G: Gateway + ?Sized>(
    gateway: &G,
    state: &SyncState,
    event_tx: &mpsc::Sender<GameEvent>,
) {
    match gateway.fetch_state().await {
        Ok(snapshot) => {
            let view = state.apply(snapshot).await;
            emit_event(event_tx, GameEvent::RoundUpdated(view));
        }
        Err(e) => {
            warn!(error = %e, "polling error");
            emit_event(
                event_tx,
                GameEvent::PollFailed {
                    message: e.status_message(),
                },
            );
        }
    }
}
