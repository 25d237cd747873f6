//! Submission guard: binds every answer or guess to the round it was typed for.
//!
//! An intent captures the round identifier known at creation time. A poll
//! that advances the round between capture and dispatch does not change
//! the round the intent is sent for; the server alone decides whether a
//! late submission is accepted.

use std::fmt;

use crate::error::{MajorityRulesError, Result};
use crate::protocol::{Ack, RoundId, SubmissionRequest};
use crate::session::Session;
use crate::view::StatusLine;

/// Whether the player is answering the prompt or guessing the majority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionKind {
    Answer,
    Guess,
}

impl SubmissionKind {
    /// Endpoint path segment, also the JSON field carrying the text.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Answer => "answer",
            Self::Guess => "guess",
        }
    }

    /// Status text shown after the server accepts the submission.
    pub fn success_message(self) -> &'static str {
        match self {
            Self::Answer => "Answer submitted",
            Self::Guess => "Guess submitted",
        }
    }

    /// Message used when the server rejects without an `{error}` body.
    pub fn fallback_error(self) -> &'static str {
        match self {
            Self::Answer => "Answer submission failed",
            Self::Guess => "Guess submission failed",
        }
    }

    fn empty_message(self) -> &'static str {
        match self {
            Self::Answer => "Enter an answer",
            Self::Guess => "Enter a guess",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// A user-initiated submission, bound to the round known when it was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionIntent {
    kind: SubmissionKind,
    round_id: RoundId,
    text: String,
}

impl SubmissionIntent {
    /// Build an intent from raw input and the currently known round.
    ///
    /// # Errors
    ///
    /// - [`MajorityRulesError::Validation`] if the trimmed text is empty.
    /// - [`MajorityRulesError::NoRound`] if no round has been fetched yet.
    pub fn capture(
        kind: SubmissionKind,
        text: &str,
        current_round: Option<RoundId>,
    ) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MajorityRulesError::Validation(kind.empty_message().into()));
        }
        let round_id = current_round.ok_or(MajorityRulesError::NoRound)?;
        Ok(Self {
            kind,
            round_id,
            text: text.to_owned(),
        })
    }

    pub fn kind(&self) -> SubmissionKind {
        self.kind
    }

    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Wire body for this intent on behalf of `session`.
    pub fn to_request<'a>(&'a self, session: &'a Session) -> SubmissionRequest<'a> {
        let (answer, guess) = match self.kind {
            SubmissionKind::Answer => (Some(self.text.as_str()), None),
            SubmissionKind::Guess => (None, Some(self.text.as_str())),
        };
        SubmissionRequest {
            player_id: session.participant_id(),
            round_id: self.round_id,
            answer,
            guess,
        }
    }
}

/// What came of a single submit action.
///
/// On success the input is cleared; on failure the original input is kept
/// so the player can retry.
#[derive(Debug)]
pub struct SubmissionOutcome {
    kind: SubmissionKind,
    input: String,
    result: Result<Ack>,
}

impl SubmissionOutcome {
    pub(crate) fn new(kind: SubmissionKind, input: impl Into<String>, result: Result<Ack>) -> Self {
        Self {
            kind,
            input: input.into(),
            result,
        }
    }

    pub fn kind(&self) -> SubmissionKind {
        self.kind
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn result(&self) -> &Result<Ack> {
        &self.result
    }

    /// The status line to render next to the input.
    pub fn status(&self) -> StatusLine {
        match &self.result {
            Ok(_) => StatusLine::info(self.kind.success_message()),
            Err(e) => StatusLine::error(e.status_message()),
        }
    }

    /// Text the input field should hold after this outcome.
    pub fn retained_input(&self) -> &str {
        match self.result {
            Ok(_) => "",
            Err(_) => &self.input,
        }
    }
}
