//! Events delivered to the presentation layer.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::guard::SubmissionKind;
use crate::protocol::{ResultsPayload, RoundId};
use crate::session::Session;
use crate::view::{RoundView, StatusLine};

/// A value the UI should render, emitted on the client's event channel.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Join succeeded; the polling loop is starting.
    Joined { session: Session },
    /// Join failed with the given message.
    JoinFailed { message: String },
    /// A poll tick fetched a fresh snapshot.
    RoundUpdated(RoundView),
    /// A poll tick failed. The loop keeps running.
    PollFailed { message: String },
    /// Status of a finished answer or guess submission.
    SubmissionStatus {
        kind: SubmissionKind,
        round_id: Option<RoundId>,
        status: StatusLine,
    },
    /// Results fetched for a round.
    ResultsReady {
        round_id: RoundId,
        payload: ResultsPayload,
    },
    /// Results could not be fetched; the message replaces the payload.
    /// `round_id` is `None` when no round was known to ask about.
    ResultsUnavailable {
        round_id: Option<RoundId>,
        message: String,
    },
}

/// Emit an event to the event channel. If the channel is full, log a warning
/// and drop the event so neither the polling loop nor an action ever blocks
/// on a slow consumer.
pub(crate) fn emit_event(event_tx: &mpsc::Sender<GameEvent>, event: GameEvent) {
    match event_tx.try_send(event) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(dropped)) => {
            warn!("event channel full, dropping event: {:?}", std::mem::discriminant(&dropped));
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!("event channel closed, receiver dropped");
        }
    }
}
