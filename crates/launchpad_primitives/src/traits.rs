use alloy::primitives::U256;

/// A trait for bonding curves that price the continuous mint of a token.
///
/// Implementations mirror the pricing of an on-chain launchpad contract and
/// must reproduce its integer arithmetic exactly, including the order of
/// multiplications and divisions, so an off-chain quote matches what the
/// contract charges for the same inputs.
///
/// # Precision
///
/// Supplies and amounts are token base units with `DECIMALS` decimals. Prices
/// returned by [`price_for_range`](BondingCurve::price_for_range) carry an
/// extra factor of `MANTISSA`; [`quote_cost`](BondingCurve::quote_cost)
/// removes it and yields quote-token base units.
///
/// # Example
///
/// ```ignore
/// use launchpad_primitives::{BondingCurve, FlatLinearCurve, CurveParameters};
/// use alloy::primitives::U256;
///
/// fn cost_of_one_token<C: BondingCurve>(curve: &C, supply: U256) -> Option<U256> {
///     curve.quote_cost(supply, U256::from(C::MANTISSA))
/// }
/// ```
pub trait BondingCurve {
    /// The number of decimal places of the minted token.
    const DECIMALS: u128;

    /// The fixed-point scale of prices, `10^DECIMALS`.
    const MANTISSA: u128;

    /// Cost of minting `amount` tokens starting at `start_supply`, in price precision.
    ///
    /// Returns zero for a zero amount and `None` when the range cannot be priced
    /// in 256 bits. Implementations are monotonic in `amount`.
    fn price_for_range(&self, start_supply: U256, amount: U256) -> Option<U256>;

    /// Supply at which the curve stops minting.
    fn max_mintable_supply(&self) -> U256;

    /// Cost of minting `amount` tokens from `start_supply` in quote-token base units.
    fn quote_cost(&self, start_supply: U256, amount: U256) -> Option<U256> {
        Some(self.price_for_range(start_supply, amount)? / U256::from(Self::MANTISSA))
    }

    /// Tokens still mintable above `supply`.
    fn headroom(&self, supply: U256) -> U256 {
        self.max_mintable_supply().saturating_sub(supply)
    }
}
