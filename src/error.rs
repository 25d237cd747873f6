//! Error types for the Majority Rules client.

use thiserror::Error;

/// Errors that can occur when using the Majority Rules client.
///
/// Every variant carries enough text to be shown to the player as-is; see
/// [`MajorityRulesError::status_message`].
#[derive(Debug, Error)]
pub enum MajorityRulesError {
    /// A required input was empty. Raised before any network call.
    #[error("{0}")]
    Validation(String),

    /// The request could not complete, or the server answered with a
    /// non-success status and no usable `{error}` body.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-success status and a structured
    /// `{"error": "..."}` body. The message is surfaced verbatim.
    #[error("{message}")]
    Server {
        /// HTTP status code of the response.
        status: u16,
        /// Human-readable error message from the server.
        message: String,
    },

    /// Failed to serialize or deserialize a payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A submission was attempted before joining the game.
    #[error("join the game first")]
    NotJoined,

    /// A submission or results fetch was attempted before any round state
    /// had been fetched.
    #[error("no round is known yet")]
    NoRound,

    /// Join was invoked after a session had already been established.
    #[error("already joined as {0}")]
    AlreadyJoined(String),
}

impl MajorityRulesError {
    /// Text to show in a status line for this error.
    pub fn status_message(&self) -> String {
        self.to_string()
    }

    /// Returns `true` if the error was raised locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotJoined | Self::NoRound | Self::AlreadyJoined(_)
        )
    }
}

/// A specialized [`Result`] type for Majority Rules client operations.
pub type Result<T> = std::result::Result<T, MajorityRulesError>;
