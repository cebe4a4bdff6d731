use crate::{chain::Chain, fees::FeeSchedule};
use alloy::primitives::{Address, U256, address};
use anyhow::{Result, anyhow};
use launchpad_primitives::{CurveParameters, PricingTier, SolverOptions};
use serde::Deserialize;
use std::{env, fs, str::FromStr, time::Duration};
use tracing::{info, warn};
use url::Url;

pub const USDC_DECIMALS: u8 = 6;
pub const WGHO_DECIMALS: u8 = 18;
pub const DEFAULT_SUPPLY_TIMEOUT: Duration = Duration::from_secs(10);

pub const BASE_USDC: Address = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
pub const LENS_WGHO: Address = address!("6bDc36E20D267Ff0dd6097799f82e78907105e2F");

#[derive(Deserialize)]
struct RawChainConfig {
    name: Chain,
    quote_token: String,
    quote_decimals: u8,
    pricing_tier: Option<PricingTier>,
    initial_price: Option<String>,
    target_price_multiplier: Option<String>,
    flat_threshold: Option<String>,
    max_mintable_supply: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawSolverConfig {
    tolerance: Option<String>,
    max_iterations: Option<u32>,
    trim_trailing_one: Option<bool>,
}

#[derive(Deserialize)]
struct RawConfig {
    protocol_fee_bps: Option<u16>,
    supply_timeout_millis: Option<u64>,
    #[serde(default)]
    solver: RawSolverConfig,
    chains: Vec<RawChainConfig>,
}

/// Per-chain quoting setup.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain: Chain,
    pub rpc_url: Option<Url>,
    pub quote_token: Address,
    pub quote_decimals: u8,
    pub curve: CurveParameters,
}

impl ChainConfig {
    pub fn base() -> Self {
        Self {
            chain: Chain::Base,
            rpc_url: None,
            quote_token: BASE_USDC,
            quote_decimals: USDC_DECIMALS,
            curve: PricingTier::Large.params(),
        }
    }

    pub fn lens() -> Self {
        Self {
            chain: Chain::Lens,
            rpc_url: None,
            quote_token: LENS_WGHO,
            quote_decimals: WGHO_DECIMALS,
            curve: PricingTier::Large.params(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub fee_schedule: FeeSchedule,
    pub solver: SolverOptions,
    pub supply_timeout: Duration,
    pub chains: Vec<ChainConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fee_schedule: FeeSchedule::default(),
            solver: SolverOptions::default(),
            supply_timeout: DEFAULT_SUPPLY_TIMEOUT,
            chains: vec![ChainConfig::base(), ChainConfig::lens()],
        }
    }
}

impl RawChainConfig {
    fn into_chain_config(self) -> Result<ChainConfig> {
        let quote_token = Address::from_str(&self.quote_token)
            .map_err(|e| anyhow!("Invalid quote_token for {}: {e}", self.name))?;
        let base = match self.pricing_tier {
            Some(tier) => tier.params(),
            None => match self.name {
                Chain::Base => ChainConfig::base().curve,
                Chain::Lens => ChainConfig::lens().curve,
            },
        };
        let curve = CurveParameters::new(
            parse_u256_or(self.initial_price.as_deref(), base.initial_price, "initial_price")?,
            parse_u256_or(
                self.target_price_multiplier.as_deref(),
                base.target_price_multiplier,
                "target_price_multiplier",
            )?,
            parse_u256_or(self.flat_threshold.as_deref(), base.flat_threshold, "flat_threshold")?,
            parse_u256_or(
                self.max_mintable_supply.as_deref(),
                base.max_mintable_supply,
                "max_mintable_supply",
            )?,
        )
        .validated()
        .map_err(|e| anyhow!("Curve for chain {}: {e}", self.name))?;
        Ok(ChainConfig {
            chain: self.name,
            rpc_url: None,
            quote_token,
            quote_decimals: self.quote_decimals,
            curve,
        })
    }
}

impl RawConfig {
    fn into_config(self) -> Result<Config> {
        let defaults = SolverOptions::default();
        let solver = SolverOptions {
            tolerance: parse_u256_or(self.solver.tolerance.as_deref(), defaults.tolerance, "tolerance")?,
            max_iterations: self.solver.max_iterations.unwrap_or(defaults.max_iterations),
            trim_trailing_one: self
                .solver
                .trim_trailing_one
                .unwrap_or(defaults.trim_trailing_one),
        };
        let fee_schedule = match self.protocol_fee_bps {
            Some(bps) => FeeSchedule::new(bps)?,
            None => FeeSchedule::default(),
        };
        let supply_timeout = self
            .supply_timeout_millis
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SUPPLY_TIMEOUT);
        let chains = self
            .chains
            .into_iter()
            .map(RawChainConfig::into_chain_config)
            .collect::<Result<Vec<_>>>()?;
        for (i, chain) in chains.iter().enumerate() {
            if chains[..i].iter().any(|other| other.chain == chain.chain) {
                return Err(anyhow!("Chain {} configured more than once", chain.chain));
            }
        }
        Ok(Config {
            fee_schedule,
            solver,
            supply_timeout,
            chains,
        })
    }
}

impl Config {
    /// Loads a TOML config; RPC endpoints are read from `BASE_RPC_URL` / `LENS_RPC_URL`.
    pub fn from_config_file(config_path: &str) -> Result<Self> {
        let contents = fs::read_to_string(config_path)
            .map_err(|e| anyhow!("Error opening {config_path}: {e}"))?;
        let config = Self::from_toml_str(&contents)?.with_rpc_urls_from_env()?;
        info!(
            "Loaded quoter config from {config_path} with chains: {:?}",
            config.chains.iter().map(|c| c.chain).collect::<Vec<_>>()
        );
        Ok(config)
    }

    /// Parses a TOML config without touching the environment; chains have no RPC endpoint.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let parsed: RawConfig = toml::from_str(contents)?;
        parsed.into_config()
    }

    /// Fills each chain's RPC endpoint from its environment variable.
    pub fn with_rpc_urls_from_env(mut self) -> Result<Self> {
        for chain_config in &mut self.chains {
            chain_config.rpc_url = rpc_url_from_env(chain_config.chain)?;
        }
        Ok(self)
    }

    pub fn chain(&self, chain: Chain) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.chain == chain)
    }
}

fn parse_u256_or(raw: Option<&str>, default: U256, field: &str) -> Result<U256> {
    match raw {
        Some(value) => U256::from_str(value.trim())
            .map_err(|e| anyhow!("Invalid {field} \"{value}\": {e}")),
        None => Ok(default),
    }
}

fn rpc_url_from_env(chain: Chain) -> Result<Option<Url>> {
    match env::var(chain.rpc_env_var()) {
        Ok(raw) => Url::parse(&raw)
            .map(Some)
            .map_err(|e| anyhow!("Invalid {}: {e}", chain.rpc_env_var())),
        Err(_) => {
            warn!("Missing {} in environment, supply reads on {chain} will fail", chain.rpc_env_var());
            Ok(None)
        }
    }
}
