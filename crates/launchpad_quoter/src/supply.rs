//! Read-only access to a club token's current supply.
//!
//! The engine treats supply as an opaque async capability so tests and other
//! callers can plug in their own source; [`RpcSupplyReader`] is the JSON-RPC
//! implementation used in production.

use crate::{chain::Chain, config::Config};
use alloy::{
    primitives::{Address, U256},
    providers::ProviderBuilder,
    sol,
};
use anyhow::{Result, anyhow};
use std::{collections::HashMap, future::Future};
use tracing::debug;
use url::Url;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function totalSupply() external view returns (uint256);
    }
}

/// Source of a token's live total supply.
pub trait SupplyReader: Send + Sync {
    fn read_total_supply(
        &self,
        token: Address,
        chain: Chain,
    ) -> impl Future<Output = Result<U256>> + Send;
}

/// Reads `totalSupply()` from the token contract over HTTP JSON-RPC.
#[derive(Debug, Clone)]
pub struct RpcSupplyReader {
    endpoints: HashMap<Chain, Url>,
}

impl RpcSupplyReader {
    pub fn new(endpoints: HashMap<Chain, Url>) -> Self {
        Self { endpoints }
    }

    /// Builds a reader from every chain in `config` that has an RPC endpoint.
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoints: HashMap<Chain, Url> = config
            .chains
            .iter()
            .filter_map(|c| c.rpc_url.clone().map(|url| (c.chain, url)))
            .collect();
        if endpoints.is_empty() {
            return Err(anyhow!(
                "No RPC endpoints configured, set {} or {}",
                Chain::Base.rpc_env_var(),
                Chain::Lens.rpc_env_var()
            ));
        }
        Ok(Self::new(endpoints))
    }

    pub fn endpoint(&self, chain: Chain) -> Option<&Url> {
        self.endpoints.get(&chain)
    }
}

impl SupplyReader for RpcSupplyReader {
    async fn read_total_supply(&self, token: Address, chain: Chain) -> Result<U256> {
        let url = self
            .endpoint(chain)
            .cloned()
            .ok_or_else(|| anyhow!("No RPC endpoint for chain {chain}"))?;
        let provider = ProviderBuilder::new().connect_http(url);
        let supply = IERC20::new(token, provider)
            .totalSupply()
            .call()
            .await
            .map_err(|e| anyhow!("totalSupply() on {token} failed: {e}"))?;
        debug!("Read total supply {supply} for {token} on {chain}");
        Ok(supply)
    }
}
