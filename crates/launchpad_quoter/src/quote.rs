use crate::{
    chain::Chain,
    config::{ChainConfig, Config},
    error::{QuoteError, Result},
    supply::SupplyReader,
};
use alloy::primitives::{
    Address, U256,
    utils::{format_units, parse_units},
};
use launchpad_primitives::{
    BondingCurve, CurveParameters, FlatLinearCurve, MAX_INITIAL_SUPPLY, PricingTier,
    TOKEN_DECIMALS, amount_for_spend, trim_trailing_one,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Buy quote input: how much quote token the user wants to spend.
#[derive(Clone, Debug)]
pub struct QuoteRequest {
    pub account: Address,
    pub token: Address,
    /// Decimal amount in quote-token units, e.g. `"25.5"`.
    pub spend_amount: String,
    pub has_fee_discount: bool,
    pub chain: Chain,
    pub curve_override: Option<CurveParameters>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuyQuote {
    /// Tokens to pass to the buy call, 18 decimals.
    pub buy_amount: U256,
    /// `effective_spend_raw` rendered with the quote token's decimals.
    pub effective_spend: String,
    /// Quote base units that actually reach the curve.
    pub effective_spend_raw: U256,
    pub spend_after_fees: U256,
    /// `None` when the quote short-circuited before reading supply.
    pub current_supply: Option<U256>,
    /// True when the buy was cut down to the remaining mintable supply.
    pub clamped: bool,
}

/// Sell quote input: how many tokens the user wants to sell.
#[derive(Clone, Debug)]
pub struct SellRequest {
    pub account: Address,
    pub token: Address,
    /// Decimal amount in token units.
    pub sell_amount: String,
    pub has_fee_discount: bool,
    pub chain: Chain,
    pub curve_override: Option<CurveParameters>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SellQuote {
    pub sell_price: U256,
    pub sell_price_after_fees: U256,
    pub current_supply: Option<U256>,
}

/// Computes buy and sell quotes against a token's live supply.
pub struct QuoteEngine<R: SupplyReader> {
    config: Arc<Config>,
    reader: R,
}

impl<R: SupplyReader> QuoteEngine<R> {
    pub fn new(config: Config, reader: R) -> Self {
        Self {
            config: Arc::new(config),
            reader,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Tokens `spend_amount` buys right now, net of fees and clamped to the mintable supply.
    pub async fn quote_buy(&self, request: &QuoteRequest) -> Result<BuyQuote> {
        let chain_config = self.chain_config(request.chain)?;
        let curve = self.curve_for(chain_config, request.curve_override)?;
        let decimals = chain_config.quote_decimals;

        let Some(spend) = parse_positive(&request.spend_amount, decimals)? else {
            debug!("Non-positive spend {:?}, returning zero quote", request.spend_amount);
            return Ok(BuyQuote {
                buy_amount: U256::ZERO,
                effective_spend: format_amount(U256::ZERO, decimals)?,
                effective_spend_raw: U256::ZERO,
                spend_after_fees: U256::ZERO,
                current_supply: None,
                clamped: false,
            });
        };
        let spend_after_fees = self
            .config
            .fee_schedule
            .apply(spend, request.has_fee_discount)?;

        let current_supply = self.read_supply(request.token, request.chain).await?;
        ensure_within_curve(&curve, current_supply)?;

        let solver = &self.config.solver;
        let mut buy_amount = amount_for_spend(&curve, spend_after_fees, current_supply, solver);
        if solver.trim_trailing_one {
            buy_amount = trim_trailing_one(buy_amount);
        }

        let max_supply = curve.max_mintable_supply();
        let mut effective_spend_raw = spend_after_fees;
        let clamped = buy_amount.saturating_add(current_supply) >= max_supply;
        if clamped {
            buy_amount = curve.headroom(current_supply);
            let cost = curve.quote_cost(current_supply, buy_amount);
            effective_spend_raw = priced(cost, current_supply)?;
            info!(
                "Buy of {} on {} clamped to remaining supply {buy_amount}, effective spend {effective_spend_raw}",
                request.token, request.chain
            );
        }

        info!(
            "Quoted buy for {} on {}: account {}, spend {spend}, after fees {spend_after_fees}, supply {current_supply}, amount {buy_amount}",
            request.token, request.chain, request.account
        );
        Ok(BuyQuote {
            buy_amount,
            effective_spend: format_amount(effective_spend_raw, decimals)?,
            effective_spend_raw,
            spend_after_fees,
            current_supply: Some(current_supply),
            clamped,
        })
    }

    /// Quote tokens returned for burning `sell_amount` tokens at the current supply.
    pub async fn quote_sell(&self, request: &SellRequest) -> Result<SellQuote> {
        let chain_config = self.chain_config(request.chain)?;
        let curve = self.curve_for(chain_config, request.curve_override)?;

        let Some(amount) = parse_positive(&request.sell_amount, TOKEN_DECIMALS)? else {
            return Ok(SellQuote {
                sell_price: U256::ZERO,
                sell_price_after_fees: U256::ZERO,
                current_supply: None,
            });
        };

        let current_supply = self.read_supply(request.token, request.chain).await?;
        ensure_within_curve(&curve, current_supply)?;
        if amount > current_supply {
            return Err(QuoteError::InvalidAmount(format!(
                "cannot sell {amount} tokens, supply is {current_supply}"
            )));
        }

        let sell_price = priced(
            curve.quote_cost(current_supply - amount, amount),
            current_supply,
        )?;
        let sell_price_after_fees = self
            .config
            .fee_schedule
            .apply(sell_price, request.has_fee_discount)?;
        info!(
            "Quoted sell for {} on {}: account {}, amount {amount}, price {sell_price}, after fees {sell_price_after_fees}",
            request.token, request.chain, request.account
        );
        Ok(SellQuote {
            sell_price,
            sell_price_after_fees,
            current_supply: Some(current_supply),
        })
    }

    /// Local equivalent of the contract's `getBuyPrice`, in quote base units.
    pub fn buy_price(
        &self,
        chain: Chain,
        supply: U256,
        amount: U256,
        curve_override: Option<CurveParameters>,
    ) -> Result<U256> {
        let curve = self.curve_for(self.chain_config(chain)?, curve_override)?;
        if supply.saturating_add(amount) > curve.max_mintable_supply() {
            return Err(QuoteError::InvalidAmount(format!(
                "buying {amount} at supply {supply} exceeds max mintable supply {}",
                curve.max_mintable_supply()
            )));
        }
        priced(curve.quote_cost(supply, amount), supply)
    }

    /// Cost of the creator's initial allocation when registering a club.
    ///
    /// `initial_supply` is in whole tokens, as entered at registration.
    pub fn registration_fee(
        &self,
        chain: Chain,
        initial_supply: &str,
        tier: Option<PricingTier>,
    ) -> Result<U256> {
        let whole_tokens = parse_positive(initial_supply, 0)?.unwrap_or(U256::ZERO);
        if whole_tokens.is_zero() {
            return Ok(U256::ZERO);
        }
        if whole_tokens > U256::from(MAX_INITIAL_SUPPLY) {
            return Err(QuoteError::InvalidAmount(format!(
                "initial supply {whole_tokens} exceeds the {MAX_INITIAL_SUPPLY} token maximum"
            )));
        }
        let amount = whole_tokens * U256::from(10).pow(U256::from(TOKEN_DECIMALS));
        self.buy_price(chain, U256::ZERO, amount, tier.map(PricingTier::params))
    }

    fn chain_config(&self, chain: Chain) -> Result<&ChainConfig> {
        self.config.chain(chain).ok_or(QuoteError::UnknownChain(chain))
    }

    fn curve_for(
        &self,
        chain_config: &ChainConfig,
        curve_override: Option<CurveParameters>,
    ) -> Result<FlatLinearCurve> {
        let params = curve_override.unwrap_or(chain_config.curve);
        Ok(FlatLinearCurve::new(params)?)
    }

    async fn read_supply(&self, token: Address, chain: Chain) -> Result<U256> {
        let timeout = self.config.supply_timeout;
        match tokio::time::timeout(timeout, self.reader.read_total_supply(token, chain)).await {
            Ok(Ok(supply)) => Ok(supply),
            Ok(Err(source)) => Err(QuoteError::SupplyUnavailable {
                token,
                chain,
                source: source.into(),
            }),
            Err(_) => Err(QuoteError::SupplyTimeout {
                token,
                chain,
                after: timeout,
            }),
        }
    }
}

/// Rejects supplies past the mintable cap; validated parameters only guarantee
/// overflow-free pricing up to it.
fn ensure_within_curve(curve: &FlatLinearCurve, supply: U256) -> Result<()> {
    if supply > curve.max_mintable_supply() {
        return Err(QuoteError::InvalidAmount(format!(
            "supply {supply} exceeds max mintable supply {}",
            curve.max_mintable_supply()
        )));
    }
    Ok(())
}

fn priced(cost: Option<U256>, supply: U256) -> Result<U256> {
    cost.ok_or_else(|| QuoteError::InvalidAmount(format!("cannot price range at supply {supply}")))
}

/// Parses a decimal amount, mapping zero and negative values to `None`.
fn parse_positive(raw: &str, decimals: u8) -> Result<Option<U256>> {
    let parsed = parse_units(raw.trim(), decimals)
        .map_err(|e| QuoteError::InvalidAmount(format!("{raw:?}: {e}")))?;
    if parsed.is_negative() {
        return Ok(None);
    }
    let value = parsed.get_absolute();
    Ok((!value.is_zero()).then_some(value))
}

fn format_amount(amount: U256, decimals: u8) -> Result<String> {
    format_units(amount, decimals).map_err(|e| QuoteError::InvalidAmount(e.to_string()))
}
