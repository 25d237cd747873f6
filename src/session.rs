//! Session identity established once at join time.

use crate::error::{MajorityRulesError, Result};
use crate::protocol::{JoinResponse, ParticipantId};

/// Shown when join is attempted with an empty name.
pub const EMPTY_NAME_MESSAGE: &str = "Enter your name";

/// The participant's identity for the lifetime of the client.
///
/// Created by a successful join and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    participant_id: ParticipantId,
    display_name: String,
}

impl Session {
    pub fn new(participant_id: impl Into<ParticipantId>, display_name: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            display_name: display_name.into(),
        }
    }

    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Status line text shown after a successful join.
    pub fn joined_message(&self) -> String {
        format!("Joined as {}", self.display_name)
    }
}

impl From<JoinResponse> for Session {
    fn from(resp: JoinResponse) -> Self {
        Self {
            participant_id: resp.player_id,
            display_name: resp.name,
        }
    }
}

/// Trim a display name, rejecting it if nothing is left.
///
/// # Errors
///
/// Returns [`MajorityRulesError::Validation`] for an empty or whitespace-only name.
pub fn validate_display_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MajorityRulesError::Validation(EMPTY_NAME_MESSAGE.into()));
    }
    Ok(trimmed)
}
