//! Market data feed.
//!
//! Defines the `MarketFeed` trait the scan cycle consumes and provides the
//! TSETMC positional-record client. The contract is deliberately lossy:
//! a fetch either yields a fully normalised `Quote` or NoData (`None`) —
//! timeouts, transport errors, and malformed records all collapse to
//! NoData at this boundary and never reach the orchestrator as errors.

pub mod tsetmc;

use async_trait::async_trait;

use crate::types::Quote;

/// Abstraction over the quote source.
///
/// Implementors must bound each call with their own timeout; the caller
/// never cancels. NoData is an ordinary per-cycle outcome, retried on the
/// next tick, never within the same cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Fetch the current quote for one instrument code.
    async fn fetch_quote(&self, code: &str) -> Option<Quote>;

    /// Feed name for logging and identification.
    fn name(&self) -> &str;
}
