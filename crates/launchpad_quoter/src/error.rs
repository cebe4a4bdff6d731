//! Error taxonomy of the quote engine.

use crate::chain::Chain;
use alloy::primitives::Address;
use launchpad_primitives::CurveError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias that carries [`QuoteError`] failures.
pub type Result<T> = std::result::Result<T, QuoteError>;

#[derive(Debug, Error)]
pub enum QuoteError {
    /// The supply read failed; no quote is produced.
    #[error("total supply of {token} on {chain} unavailable: {source}")]
    SupplyUnavailable {
        token: Address,
        chain: Chain,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The supply read did not answer in time.
    #[error("total supply of {token} on {chain} timed out after {after:?}")]
    SupplyTimeout {
        token: Address,
        chain: Chain,
        after: Duration,
    },
    #[error(transparent)]
    InvalidParameters(#[from] CurveError),
    /// A user-supplied amount could not be parsed or is out of range.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("chain {0} is not configured")]
    UnknownChain(Chain),
}

impl QuoteError {
    /// True for both flavors of a failed supply read.
    pub fn is_supply_unavailable(&self) -> bool {
        matches!(
            self,
            QuoteError::SupplyUnavailable { .. } | QuoteError::SupplyTimeout { .. }
        )
    }
}
