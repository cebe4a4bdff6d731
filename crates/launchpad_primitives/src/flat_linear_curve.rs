use crate::{
    error::CurveError,
    params::{BPS_MAX, CurveParameters, WAD},
    traits::BondingCurve,
};
use alloy::primitives::U256;

/// The launchpad's flat-then-linear curve.
///
/// Below `flat_threshold` every token costs `initial_price`. Above it the
/// price rises linearly towards `initial_price * target_price_multiplier`,
/// and the cost of a range is the difference of two quadratic areas
/// evaluated at whole-token offsets from the threshold, exactly as the
/// contract computes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatLinearCurve {
    params: CurveParameters,
    slope: U256,
}

impl FlatLinearCurve {
    /// Validates `params` and precomputes the slope of the linear segment.
    pub fn new(params: CurveParameters) -> Result<Self, CurveError> {
        params.validate()?;
        let slope = (params.target_price() - params.initial_price) * U256::from(BPS_MAX)
            / (params.max_mintable_supply / U256::from(WAD));
        Ok(Self { params, slope })
    }

    pub fn params(&self) -> &CurveParameters {
        &self.params
    }

    /// Price increase per whole token on the linear segment, scaled by `BPS_MAX`.
    pub fn slope(&self) -> U256 {
        self.slope
    }

    fn flat_cost(&self, amount: U256) -> Option<U256> {
        Some(amount.checked_mul(self.params.initial_price)? / U256::from(WAD))
    }

    fn curve_cost(&self, start_supply: U256, end_supply: U256) -> Option<U256> {
        let area_start = self.area(self.offset(start_supply))?;
        let area_end = self.area(self.offset(end_supply))?;
        Some(area_end.checked_sub(area_start)? / U256::from(BPS_MAX))
    }

    // Whole tokens above the flat threshold; both terms floor independently.
    fn offset(&self, supply: U256) -> U256 {
        let unit = U256::from(WAD);
        (supply / unit).saturating_sub(self.params.flat_threshold / unit)
    }

    fn area(&self, x: U256) -> Option<U256> {
        let quadratic = self.slope.checked_mul(x)?.checked_mul(x)? / U256::from(2);
        let linear = self
            .params
            .initial_price
            .checked_mul(U256::from(BPS_MAX))?
            .checked_mul(x)?;
        quadratic.checked_add(linear)
    }
}

impl BondingCurve for FlatLinearCurve {
    const DECIMALS: u128 = 18;
    const MANTISSA: u128 = WAD;

    fn price_for_range(&self, start_supply: U256, amount: U256) -> Option<U256> {
        if amount.is_zero() {
            return Some(U256::ZERO);
        }
        let flat_threshold = self.params.flat_threshold;
        let end_supply = start_supply.checked_add(amount)?;

        if start_supply >= flat_threshold {
            return self.curve_cost(start_supply, end_supply);
        }
        if end_supply <= flat_threshold {
            return self.flat_cost(amount);
        }
        // Range straddles the threshold: one flat piece, then one curve piece from the threshold.
        self.flat_cost(flat_threshold - start_supply)?
            .checked_add(self.curve_cost(flat_threshold, end_supply)?)
    }

    fn max_mintable_supply(&self) -> U256 {
        self.params.max_mintable_supply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FLAT_THRESHOLD, MAX_MINTABLE_SUPPLY, PricingTier};
    use alloy::primitives::utils::parse_ether;

    fn tokens(n: u64) -> U256 {
        U256::from(n) * U256::from(WAD)
    }

    fn pow10(exp: u64) -> U256 {
        U256::from(10).pow(U256::from(exp))
    }

    /// 1 quote token per token on the flat part, 200 flat tokens out of 1000.
    fn small_curve() -> FlatLinearCurve {
        FlatLinearCurve::new(CurveParameters::new(
            pow10(36),
            U256::from(5),
            tokens(200),
            tokens(1000),
        ))
        .unwrap()
    }

    #[test]
    fn flat_segment_matches_reference_example() {
        let curve = FlatLinearCurve::new(CurveParameters::new(
            U256::from(WAD),
            U256::from(5),
            U256::from(FLAT_THRESHOLD),
            U256::from(MAX_MINTABLE_SUPPLY),
        ))
        .unwrap();
        let cost = curve.price_for_range(U256::ZERO, parse_ether("100").unwrap()).unwrap();
        assert_eq!(cost, parse_ether("100").unwrap());
    }

    #[test]
    fn zero_amount_costs_nothing() {
        let curve = small_curve();
        for supply in [0u64, 150, 200, 500, 1000] {
            assert_eq!(
                curve.price_for_range(tokens(supply), U256::ZERO),
                Some(U256::ZERO)
            );
        }
    }

    #[test]
    fn slope_is_normalised_by_whole_token_supply() {
        // (5e36 - 1e36) * 1e4 / 1000
        assert_eq!(small_curve().slope(), U256::from(4) * pow10(37));
    }

    #[test]
    fn curve_segment_integrates_linear_price() {
        let curve = small_curve();
        // 2e33 * (10^2 - 0) + 1e36 * 10
        let expected = U256::from(2) * pow10(35) + pow10(37);
        assert_eq!(curve.price_for_range(tokens(200), tokens(10)).unwrap(), expected);
    }

    #[test]
    fn range_crossing_threshold_is_split_once() {
        let curve = small_curve();
        // 10 flat tokens at 1e36 plus 10 curve tokens from the threshold.
        let expected = U256::from(202) * pow10(35);
        assert_eq!(curve.price_for_range(tokens(190), tokens(20)).unwrap(), expected);
        assert_eq!(
            curve.quote_cost(tokens(190), tokens(20)).unwrap(),
            U256::from(202) * pow10(17)
        );
    }

    #[test]
    fn cost_is_additive_over_whole_token_splits() {
        let curve = small_curve();
        let start = tokens(185);
        let total = tokens(30);
        let whole = curve.price_for_range(start, total).unwrap();
        for split in 0..=30u64 {
            let first = tokens(split);
            let second = total - first;
            assert_eq!(
                curve.price_for_range(start, first).unwrap()
                    + curve.price_for_range(start + first, second).unwrap(),
                whole,
                "split at {split} tokens"
            );
        }
    }

    #[test]
    fn cost_is_monotonic_in_amount() {
        let curve = small_curve();
        let step = parse_ether("7.3").unwrap();
        for start in [U256::ZERO, tokens(150), parse_ether("199.5").unwrap(), tokens(600)] {
            let mut amount = U256::ZERO;
            let mut previous = U256::ZERO;
            while start + amount <= tokens(1000) {
                let cost = curve.price_for_range(start, amount).unwrap();
                assert!(cost >= previous, "cost fell at amount {amount} from {start}");
                previous = cost;
                amount += step;
            }
        }
    }

    #[test]
    fn partial_tokens_on_curve_floor_to_whole_tokens() {
        let curve = small_curve();
        let just_under_one = U256::from(WAD - 1);
        assert_eq!(curve.price_for_range(tokens(200), just_under_one).unwrap(), U256::ZERO);
        assert!(curve.price_for_range(tokens(200), tokens(1)).unwrap() > U256::ZERO);
    }

    #[test]
    fn production_tier_prices_full_curve_without_overflow() {
        let curve = FlatLinearCurve::new(PricingTier::Large.params()).unwrap();
        let full = curve.price_for_range(U256::ZERO, U256::from(MAX_MINTABLE_SUPPLY)).unwrap();
        let flat = curve.price_for_range(U256::ZERO, U256::from(FLAT_THRESHOLD)).unwrap();
        assert!(full > flat);
        assert_eq!(
            flat,
            U256::from(FLAT_THRESHOLD) * PricingTier::Large.initial_price() / U256::from(WAD)
        );
    }

    #[test]
    fn out_of_range_supply_is_not_priced() {
        let curve = small_curve();
        assert_eq!(curve.price_for_range(U256::MAX - U256::from(1), tokens(2)), None);
        assert_eq!(curve.quote_cost(U256::MAX / U256::from(2), tokens(1)), None);
    }

    #[test]
    fn invalid_params_are_rejected_on_construction() {
        let params = CurveParameters::new(pow10(36), U256::from(5), tokens(1000), tokens(1000));
        assert!(matches!(
            FlatLinearCurve::new(params),
            Err(CurveError::InvalidParameters(_))
        ));
    }
}
