//! Remote gateway abstraction for the Majority Rules game server.
//!
//! The [`Gateway`] trait is the single seam between the client's
//! synchronization logic and the network. Each method performs one
//! independent, stateless request: no retry, no backoff, no coalescing.
//! Every error is terminal for that call and the caller decides whether to
//! surface or ignore it.
//!
//! # Implementing a Custom Gateway
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use majority_rules_client::error::Result;
//! use majority_rules_client::gateway::Gateway;
//! use majority_rules_client::guard::SubmissionIntent;
//! use majority_rules_client::protocol::{Ack, ResultsPayload, RoundId, RoundSnapshot};
//! use majority_rules_client::session::Session;
//!
//! struct MyGateway { /* ... */ }
//!
//! #[async_trait]
//! impl Gateway for MyGateway {
//!     async fn join(&self, name: &str) -> Result<Session> {
//!         Ok(Session::new("p-1", name))
//!     }
//!
//!     async fn fetch_state(&self) -> Result<RoundSnapshot> {
//!         unreachable!()
//!     }
//!
//!     async fn submit(&self, intent: &SubmissionIntent, session: &Session) -> Result<Ack> {
//!         unreachable!()
//!     }
//!
//!     async fn fetch_results(&self, round_id: RoundId) -> Result<ResultsPayload> {
//!         unreachable!()
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::guard::SubmissionIntent;
use crate::protocol::{Ack, ResultsPayload, RoundId, RoundSnapshot};
use crate::session::Session;

/// The four remote operations of the game server.
///
/// Implementations must be shareable between the polling task and the
/// client handle, hence `Send + Sync + 'static`. Methods take `&self` so a
/// poll tick and a user-triggered submission may be in flight at once.
#[async_trait]
pub trait Gateway: Send + Sync + 'static {
    /// Register a participant under the given (already validated) name.
    ///
    /// # Errors
    ///
    /// Returns [`MajorityRulesError::Server`](crate::MajorityRulesError::Server)
    /// with the server's message, or
    /// [`MajorityRulesError::Transport`](crate::MajorityRulesError::Transport)
    /// with the fallback `"Join failed"`.
    async fn join(&self, name: &str) -> Result<Session>;

    /// Fetch the authoritative round state.
    ///
    /// # Errors
    ///
    /// Returns [`MajorityRulesError::Transport`](crate::MajorityRulesError::Transport)
    /// on any non-success status (`"State request failed: <status>"`) or
    /// transport failure.
    async fn fetch_state(&self) -> Result<RoundSnapshot>;

    /// Send an answer or guess for the round captured in the intent.
    ///
    /// # Errors
    ///
    /// Returns the server's `{error}` message when present, else the
    /// per-kind fallback message.
    async fn submit(&self, intent: &SubmissionIntent, session: &Session) -> Result<Ack>;

    /// Fetch the results of a specific round.
    ///
    /// # Errors
    ///
    /// Returns the server's `{error}` message when present, else
    /// `"Results not available yet"`.
    async fn fetch_results(&self, round_id: RoundId) -> Result<ResultsPayload>;
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for std::sync::Arc<G> {
    async fn join(&self, name: &str) -> Result<Session> {
        (**self).join(name).await
    }

    async fn fetch_state(&self) -> Result<RoundSnapshot> {
        (**self).fetch_state().await
    }

    async fn submit(&self, intent: &SubmissionIntent, session: &Session) -> Result<Ack> {
        (**self).submit(intent, session).await
    }

    async fn fetch_results(&self, round_id: RoundId) -> Result<ResultsPayload> {
        (**self).fetch_results(round_id).await
    }
}
