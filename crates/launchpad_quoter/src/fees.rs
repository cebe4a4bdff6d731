use crate::error::{QuoteError, Result};
use alloy::primitives::U256;
use launchpad_primitives::{BPS_MAX, CurveError};

/// Protocol fee charged on trades by holders without a fee discount.
pub const DEFAULT_PROTOCOL_FEE_BPS: u16 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSchedule {
    protocol_fee_bps: u16,
}

impl FeeSchedule {
    pub fn new(protocol_fee_bps: u16) -> Result<Self> {
        if u128::from(protocol_fee_bps) > BPS_MAX {
            return Err(QuoteError::InvalidParameters(CurveError::InvalidParameters(
                format!("protocol fee of {protocol_fee_bps} bps exceeds {BPS_MAX} bps"),
            )));
        }
        Ok(Self { protocol_fee_bps })
    }

    pub fn protocol_fee_bps(&self) -> u16 {
        self.protocol_fee_bps
    }

    /// Share of an amount kept after the fee, in basis points.
    pub fn retained_bps(&self) -> U256 {
        U256::from(BPS_MAX - u128::from(self.protocol_fee_bps))
    }

    /// `amount` net of the protocol fee, rounded down. Discounted callers pay no fee.
    pub fn apply(&self, amount: U256, has_fee_discount: bool) -> Result<U256> {
        if has_fee_discount {
            return Ok(amount);
        }
        let scaled = amount.checked_mul(self.retained_bps()).ok_or_else(|| {
            QuoteError::InvalidAmount(format!("{amount} is too large to apply the protocol fee"))
        })?;
        Ok(scaled / U256::from(BPS_MAX))
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            protocol_fee_bps: DEFAULT_PROTOCOL_FEE_BPS,
        }
    }
}
