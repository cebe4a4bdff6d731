use crate::error::CurveError;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Basis point denominator shared by the curve slope and the fee schedule.
pub const BPS_MAX: u128 = 10_000;

/// One whole token with 18 decimals.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Token decimals used by every launchpad club token.
pub const TOKEN_DECIMALS: u8 = 18;

/// Hard cap on tokens the curve will ever mint.
pub const MAX_MINTABLE_SUPPLY: u128 = 800_000_000 * WAD;

/// Supply below which the price stays at `initial_price`.
pub const FLAT_THRESHOLD: u128 = 200_000_000 * WAD;

/// Largest creator allocation at registration, in whole tokens (10% of the mintable supply).
pub const MAX_INITIAL_SUPPLY: u64 = 80_000_000;

/// Price at `max_mintable_supply` relative to `initial_price` for every preset tier.
pub const DEFAULT_TARGET_PRICE_MULTIPLIER: u64 = 5;

/// Parameters of a flat-then-linear bonding curve.
///
/// `initial_price` is expressed in the contract's price precision: quote-token
/// base units per whole token, scaled by an extra `10^18`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveParameters {
    pub initial_price: U256,
    pub target_price_multiplier: U256,
    pub flat_threshold: U256,
    pub max_mintable_supply: U256,
}

impl CurveParameters {
    pub fn new(
        initial_price: U256,
        target_price_multiplier: U256,
        flat_threshold: U256,
        max_mintable_supply: U256,
    ) -> Self {
        Self {
            initial_price,
            target_price_multiplier,
            flat_threshold,
            max_mintable_supply,
        }
    }

    /// Curve parameters with the launchpad's fixed supply layout and a custom initial price.
    pub fn with_initial_price(initial_price: U256) -> Self {
        Self::new(
            initial_price,
            U256::from(DEFAULT_TARGET_PRICE_MULTIPLIER),
            U256::from(FLAT_THRESHOLD),
            U256::from(MAX_MINTABLE_SUPPLY),
        )
    }

    /// Price reached at `max_mintable_supply`. Saturates on absurd inputs; `validate` rejects those.
    pub fn target_price(&self) -> U256 {
        self.initial_price
            .saturating_mul(self.target_price_multiplier)
    }

    /// Checks the invariants the pricing function relies on.
    ///
    /// Besides the ordering of the thresholds this also verifies that the
    /// largest intermediate value of the area computation fits in 256 bits,
    /// so pricing a validated curve cannot overflow.
    pub fn validate(&self) -> Result<(), CurveError> {
        let unit = U256::from(WAD);
        if self.initial_price.is_zero() {
            return Err(CurveError::InvalidParameters(
                "initial price must be non-zero".into(),
            ));
        }
        if self.target_price_multiplier.is_zero() {
            return Err(CurveError::InvalidParameters(
                "target price multiplier must be at least 1".into(),
            ));
        }
        if self.max_mintable_supply < unit {
            return Err(CurveError::InvalidParameters(format!(
                "max mintable supply {} is below one whole token",
                self.max_mintable_supply
            )));
        }
        if self.flat_threshold >= self.max_mintable_supply {
            return Err(CurveError::InvalidParameters(format!(
                "flat threshold {} must be below max mintable supply {}",
                self.flat_threshold, self.max_mintable_supply
            )));
        }

        let overflow = || CurveError::InvalidParameters("curve parameters overflow 256 bits".into());
        let target_price = self
            .initial_price
            .checked_mul(self.target_price_multiplier)
            .ok_or_else(overflow)?;
        let slope = (target_price - self.initial_price)
            .checked_mul(U256::from(BPS_MAX))
            .ok_or_else(overflow)?
            / (self.max_mintable_supply / unit);
        let x_max = self.max_mintable_supply / unit;
        slope
            .checked_mul(x_max)
            .and_then(|v| v.checked_mul(x_max))
            .ok_or_else(overflow)?;
        self.initial_price
            .checked_mul(U256::from(BPS_MAX))
            .and_then(|v| v.checked_mul(x_max))
            .ok_or_else(overflow)?;
        self.max_mintable_supply
            .checked_mul(self.initial_price)
            .ok_or_else(overflow)?;
        Ok(())
    }

    pub fn validated(self) -> Result<Self, CurveError> {
        self.validate()?;
        Ok(self)
    }
}

impl Default for CurveParameters {
    fn default() -> Self {
        PricingTier::Large.params()
    }
}

/// Launch presets offered at registration. Initial prices assume an
/// 18-decimal quote token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingTier {
    /// Testnet tier that graduates after roughly one quote token.
    Test,
    Small,
    Medium,
    Large,
}

impl PricingTier {
    pub const ALL: [PricingTier; 4] = [
        PricingTier::Test,
        PricingTier::Small,
        PricingTier::Medium,
        PricingTier::Large,
    ];

    pub fn initial_price(self) -> U256 {
        let price: u128 = match self {
            PricingTier::Test => 588_251_339_500_000_000_000_000_000,
            PricingTier::Small => 3_529_508_034_062_500_000_000_000_000_000,
            PricingTier::Medium => 6_471_118_034_062_500_000_000_000_000_000,
            PricingTier::Large => 12_384_118_034_062_500_000_000_000_000_000,
        };
        U256::from(price)
    }

    pub fn params(self) -> CurveParameters {
        CurveParameters::with_initial_price(self.initial_price())
    }
}

impl fmt::Display for PricingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PricingTier::Test => "test",
            PricingTier::Small => "small",
            PricingTier::Medium => "medium",
            PricingTier::Large => "large",
        };
        f.write_str(name)
    }
}

impl FromStr for PricingTier {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "test" => Ok(PricingTier::Test),
            "small" => Ok(PricingTier::Small),
            "medium" => Ok(PricingTier::Medium),
            "large" => Ok(PricingTier::Large),
            other => Err(CurveError::InvalidParameters(format!(
                "unknown pricing tier: {other}"
            ))),
        }
    }
}
