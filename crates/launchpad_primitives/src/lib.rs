pub mod error;
pub mod flat_linear_curve;
pub mod params;
pub mod solver;
pub mod traits;

pub use error::CurveError;
pub use flat_linear_curve::FlatLinearCurve;
pub use params::{
    BPS_MAX, CurveParameters, DEFAULT_TARGET_PRICE_MULTIPLIER, FLAT_THRESHOLD,
    MAX_INITIAL_SUPPLY, MAX_MINTABLE_SUPPLY, PricingTier, TOKEN_DECIMALS, WAD,
};
pub use solver::{SolverOptions, amount_for_spend, trim_trailing_one};
pub use traits::BondingCurve;
