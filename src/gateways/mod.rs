//! Gateway implementations for the Majority Rules server.
//!
//! This module provides concrete [`Gateway`](crate::Gateway) implementations
//! behind feature gates:
//!
//! | Feature        | Gateway         |
//! |----------------|-----------------|
//! | `gateway-http` | [`HttpGateway`] |
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), majority_rules_client::MajorityRulesError> {
//! use majority_rules_client::{Gateway, HttpGateway, HttpGatewayConfig};
//!
//! let gateway = HttpGateway::new(
//!     HttpGatewayConfig::new("http://127.0.0.1:8000/api").with_ngrok_skip_warning(),
//! )?;
//! let snapshot = gateway.fetch_state().await?;
//! println!("round {:?} of {:?}", snapshot.round_id, snapshot.round_total);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "gateway-http")]
pub mod http;

#[cfg(feature = "gateway-http")]
pub use http::{HttpGateway, HttpGatewayConfig};
