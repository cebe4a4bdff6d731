use crate::traits::BondingCurve;
use alloy::primitives::U256;
use tracing::{debug, warn};

/// Knobs for [`amount_for_spend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverOptions {
    /// Half-width of the band around the spend, in quote base units, that ends
    /// the search early. The band is open, so zero never short-circuits.
    pub tolerance: U256,
    /// Hard cap on search iterations before falling back to the best guess.
    pub max_iterations: u32,
    /// Apply [`trim_trailing_one`] to solved amounts.
    pub trim_trailing_one: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tolerance: U256::ZERO,
            max_iterations: 100,
            trim_trailing_one: false,
        }
    }
}

/// Finds how many tokens `spend` quote base units buy starting at `start_supply`.
///
/// Binary searches `[0, max_mintable_supply - start_supply]` for the largest
/// amount whose [`quote_cost`](BondingCurve::quote_cost) does not exceed
/// `spend`. The result never costs more than `spend`; if the iteration cap
/// is hit the largest affordable amount seen so far is returned.
pub fn amount_for_spend<C: BondingCurve>(
    curve: &C,
    spend: U256,
    start_supply: U256,
    options: &SolverOptions,
) -> U256 {
    let headroom = curve.headroom(start_supply);
    if spend.is_zero() || headroom.is_zero() {
        return U256::ZERO;
    }

    let mut low = U256::ZERO;
    let mut high = headroom;
    let mut best_guess = U256::ZERO;
    let mut iterations = 0u32;

    while low <= high {
        if iterations >= options.max_iterations {
            warn!(
                "Solver hit {} iterations for spend {spend}, falling back to {best_guess}",
                options.max_iterations
            );
            return best_guess;
        }
        iterations += 1;

        let mid = (low + high) / U256::from(2);
        let affordable = match curve.quote_cost(start_supply, mid) {
            Some(cost) if within_band(cost, spend, options.tolerance) => {
                debug!("Solver matched spend within tolerance after {iterations} iterations");
                return mid;
            }
            Some(cost) => cost <= spend,
            // unpriceable ranges count as too expensive
            None => false,
        };

        if affordable {
            best_guess = mid;
            low = mid + U256::from(1);
        } else if mid.is_zero() {
            break;
        } else {
            high = mid - U256::from(1);
        }
    }

    debug!("Solver converged on {best_guess} after {iterations} iterations");
    best_guess
}

fn within_band(cost: U256, spend: U256, tolerance: U256) -> bool {
    cost > spend.saturating_sub(tolerance) && cost < spend.saturating_add(tolerance)
}

/// Zeroes the last digit of amounts longer than 20 digits that end in `1`.
///
/// Only ever lowers the amount, so a trimmed quote still never overspends.
pub fn trim_trailing_one(amount: U256) -> U256 {
    let digits = amount.to_string();
    if digits.len() > 20 && digits.ends_with('1') {
        amount - U256::from(1)
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        flat_linear_curve::FlatLinearCurve,
        params::{CurveParameters, PricingTier, WAD},
    };
    use std::str::FromStr;

    fn tokens(n: u64) -> U256 {
        U256::from(n) * U256::from(WAD)
    }

    fn small_curve() -> FlatLinearCurve {
        FlatLinearCurve::new(CurveParameters::new(
            U256::from(10).pow(U256::from(36)),
            U256::from(5),
            tokens(200),
            tokens(1000),
        ))
        .unwrap()
    }

    #[test]
    fn zero_spend_buys_nothing() {
        let amount = amount_for_spend(&small_curve(), U256::ZERO, U256::ZERO, &SolverOptions::default());
        assert_eq!(amount, U256::ZERO);
    }

    #[test]
    fn exhausted_supply_buys_nothing() {
        let curve = small_curve();
        let amount = amount_for_spend(&curve, tokens(50), tokens(1000), &SolverOptions::default());
        assert_eq!(amount, U256::ZERO);
    }

    #[test]
    fn flat_segment_solves_exactly() {
        let curve = small_curve();
        let spend = tokens(100);
        let amount = amount_for_spend(&curve, spend, U256::ZERO, &SolverOptions::default());
        assert_eq!(amount, tokens(100));
        assert!(curve.quote_cost(U256::ZERO, amount).unwrap() <= spend);
        assert!(curve.quote_cost(U256::ZERO, amount + U256::from(1)).unwrap() > spend);
    }

    #[test]
    fn curve_segment_returns_largest_affordable_amount() {
        let curve = small_curve();
        let start = tokens(200);
        let spend = curve.quote_cost(start, tokens(10)).unwrap();
        let amount = amount_for_spend(&curve, spend, start, &SolverOptions::default());

        // Curve pricing floors to whole tokens, so everything short of the 11th token is affordable.
        assert_eq!(amount, tokens(11) - U256::from(1));
        assert!(curve.quote_cost(start, amount).unwrap() <= spend);
        assert!(curve.quote_cost(start, amount + U256::from(1)).unwrap() > spend);
    }

    #[test]
    fn inverse_is_consistent_across_the_threshold() {
        let curve = small_curve();
        let start = tokens(150);
        for spend in [tokens(10), tokens(49), tokens(75), tokens(400)] {
            let amount = amount_for_spend(&curve, spend, start, &SolverOptions::default());
            assert!(curve.quote_cost(start, amount).unwrap() <= spend);
            if amount < curve.headroom(start) {
                assert!(curve.quote_cost(start, amount + U256::from(1)).unwrap() > spend);
            }
        }
    }

    #[test]
    fn oversized_spend_is_capped_at_headroom() {
        let curve = small_curve();
        let amount = amount_for_spend(&curve, tokens(1_000_000), tokens(10), &SolverOptions::default());
        assert_eq!(amount, tokens(990));
    }

    #[test]
    fn iteration_cap_falls_back_to_affordable_guess() {
        let curve = small_curve();
        let options = SolverOptions {
            max_iterations: 5,
            ..SolverOptions::default()
        };
        let spend = tokens(100);
        let amount = amount_for_spend(&curve, spend, U256::ZERO, &options);
        assert!(amount > U256::ZERO);
        assert!(amount < tokens(100));
        assert!(curve.quote_cost(U256::ZERO, amount).unwrap() <= spend);
    }

    #[test]
    fn tolerance_band_stops_early_near_spend() {
        let curve = small_curve();
        let tolerance = tokens(1);
        let options = SolverOptions {
            tolerance,
            ..SolverOptions::default()
        };
        let spend = tokens(100);
        let amount = amount_for_spend(&curve, spend, U256::ZERO, &options);
        let cost = curve.quote_cost(U256::ZERO, amount).unwrap();
        assert!(cost > spend - tolerance && cost < spend + tolerance);
    }

    #[test]
    fn production_curve_converges_within_cap() {
        let curve = FlatLinearCurve::new(PricingTier::Large.params()).unwrap();
        let start = tokens(250_000_000);
        let spend = tokens(1_000);
        let amount = amount_for_spend(&curve, spend, start, &SolverOptions::default());
        assert!(amount > U256::ZERO);
        assert!(curve.quote_cost(start, amount).unwrap() <= spend);
        assert!(curve.quote_cost(start, amount + U256::from(1)).unwrap() > spend);
    }

    /// One quote unit per token, but nothing past 50 tokens can be priced.
    struct OverflowingCurve;

    impl BondingCurve for OverflowingCurve {
        const DECIMALS: u128 = 18;
        const MANTISSA: u128 = WAD;

        fn price_for_range(&self, start_supply: U256, amount: U256) -> Option<U256> {
            (start_supply + amount <= tokens(50)).then(|| amount * U256::from(WAD))
        }

        fn max_mintable_supply(&self) -> U256 {
            tokens(1000)
        }
    }

    #[test]
    fn unpriceable_ranges_are_treated_as_unaffordable() {
        let amount = amount_for_spend(
            &OverflowingCurve,
            tokens(100),
            U256::ZERO,
            &SolverOptions::default(),
        );
        assert_eq!(amount, tokens(50));
    }

    #[test]
    fn trailing_one_is_trimmed_only_on_long_amounts() {
        let long = U256::from_str("123456789012345678901").unwrap();
        assert_eq!(trim_trailing_one(long), U256::from_str("123456789012345678900").unwrap());

        let twenty_digits = U256::from_str("12345678901234567891").unwrap();
        assert_eq!(trim_trailing_one(twenty_digits), twenty_digits);

        let ends_in_two = U256::from_str("123456789012345678902").unwrap();
        assert_eq!(trim_trailing_one(ends_in_two), ends_in_two);
    }
}
