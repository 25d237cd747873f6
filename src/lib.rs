//! # Majority Rules Client
//!
//! Participant-side client for the Majority Rules party game: players answer
//! a prompt, then guess the majority answer. The game server owns all state;
//! this crate keeps a local view of it in sync by polling.
//!
//! ## Features
//!
//! - **Gateway-agnostic** — implement the [`Gateway`] trait for any backend
//! - **HTTP built-in** — default `gateway-http` feature provides [`HttpGateway`]
//! - **Resilient polling** — a failed poll is reported and the loop keeps going
//! - **Round-bound submissions** — answers and guesses carry the round they were typed for
//! - **Event-driven** — receive renderable [`GameEvent`]s via a channel
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use majority_rules_client::{
//!     ClientConfig, GameEvent, HttpGateway, HttpGatewayConfig, MajorityRulesClient,
//! };
//!
//! # async fn run() -> Result<(), majority_rules_client::MajorityRulesError> {
//! let gateway = HttpGateway::new(HttpGatewayConfig::new("http://127.0.0.1:8000/api"))?;
//! let (client, mut events) = MajorityRulesClient::start(gateway, ClientConfig::default());
//!
//! client.join("Alice").await?;
//! while let Some(event) = events.recv().await {
//!     if let GameEvent::RoundUpdated(view) = event {
//!         println!("{}  {}", view.headline(), view.prompt);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod event;
pub mod gateway;
pub mod gateways;
pub mod guard;
pub mod poller;
pub mod protocol;
pub mod session;
pub mod sync;
pub mod view;

// Re-export primary types for ergonomic imports.
pub use client::{ClientConfig, MajorityRulesClient};
pub use error::MajorityRulesError;
pub use event::GameEvent;
pub use gateway::Gateway;
#[cfg(feature = "gateway-http")]
pub use gateways::{HttpGateway, HttpGatewayConfig};
pub use guard::{SubmissionIntent, SubmissionKind, SubmissionOutcome};
pub use poller::PollHandle;
pub use protocol::{Phase, RoundId, RoundSnapshot};
pub use session::Session;
pub use view::{Region, RoundView, StatusLine};
