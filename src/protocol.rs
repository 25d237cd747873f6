//! Wire types for the Majority Rules game server's REST API.
//!
//! | Endpoint                    | Request body                        | Success body                          |
//! |-----------------------------|-------------------------------------|---------------------------------------|
//! | `POST join`                 | [`JoinRequest`]                     | [`JoinResponse`]                      |
//! | `GET state`                 | —                                   | [`RoundSnapshot`]                     |
//! | `POST answer` / `POST guess`| [`SubmissionRequest`]               | [`Ack`] (any JSON)                    |
//! | `GET results?round_id=<id>` | —                                   | [`ResultsPayload`] (any JSON)         |
//!
//! Every endpoint may answer a non-success status with an [`ErrorBody`].

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Type aliases ────────────────────────────────────────────────────

/// Integer tying a prompt, its submissions and its results together.
pub type RoundId = u32;

// ── Identifiers ─────────────────────────────────────────────────────

/// Opaque participant identifier issued by the server at join time.
///
/// The value is echoed back exactly as received, whether the server issued
/// a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(serde_json::Value);

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(serde_json::Value::String(id.to_owned()))
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(serde_json::Value::String(id))
    }
}

impl From<u64> for ParticipantId {
    fn from(id: u64) -> Self {
        Self(serde_json::Value::from(id))
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

// ── Phase ───────────────────────────────────────────────────────────

/// Server-declared stage of the current round.
///
/// Unknown phase names (e.g. `"LOBBY"`) are preserved in [`Phase::Other`]
/// rather than rejected. A phase that is not a string at all decodes as
/// `Other` holding its JSON text, and a missing phase as `Other("")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "String")]
pub enum Phase {
    /// Players type an answer to the prompt.
    Answer,
    /// Players guess the majority answer.
    Guess,
    /// The round's results are available.
    Results,
    /// Any phase this client does not act on.
    Other(String),
}

impl Phase {
    /// The wire name of the phase.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Answer => "ANSWER",
            Self::Guess => "GUESS",
            Self::Results => "RESULTS",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Phase {
    fn from(name: String) -> Self {
        match name.as_str() {
            "ANSWER" => Self::Answer,
            "GUESS" => Self::Guess,
            "RESULTS" => Self::Results,
            _ => Self::Other(name),
        }
    }
}

impl From<serde_json::Value> for Phase {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(name) => Self::from(name),
            other => Self::Other(other.to_string()),
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<&str> for Phase {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<Phase> for String {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Payloads ────────────────────────────────────────────────────────

/// Body of `POST join`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinRequest {
    pub name: String,
}

/// Success body of `POST join`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinResponse {
    pub player_id: ParticipantId,
    pub name: String,
}

/// Full state payload returned by a single `GET state`.
///
/// A newer snapshot always replaces the previous one wholesale. Between
/// games the server may send no round at all (`"round_id": null`); such a
/// snapshot still applies, it just leaves nothing to submit against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSnapshot {
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub round_id: Option<RoundId>,
    #[serde(default)]
    pub round_total: Option<RoundId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Body of `POST answer` and `POST guess`.
///
/// Exactly one of `answer` / `guess` is set, matching the endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubmissionRequest<'a> {
    pub player_id: &'a ParticipantId,
    pub round_id: RoundId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guess: Option<&'a str>,
}

/// Acknowledgement body of a successful submission. Its shape is not
/// interpreted by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ack(pub serde_json::Value);

/// Opaque structured results for a single round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultsPayload(pub serde_json::Value);

impl ResultsPayload {
    /// Pretty-printed JSON with two-space indentation.
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

/// Error body the server may attach to a non-success response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract a non-empty server error message from a raw response body.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
    }
}
