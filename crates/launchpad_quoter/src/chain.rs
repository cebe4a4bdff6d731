use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Networks the launchpad is deployed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Quotes in USDC.
    Base,
    /// Quotes in wrapped GHO.
    Lens,
}

impl Chain {
    pub const ALL: [Chain; 2] = [Chain::Base, Chain::Lens];

    pub fn as_str(self) -> &'static str {
        match self {
            Chain::Base => "base",
            Chain::Lens => "lens",
        }
    }

    /// Environment variable holding the chain's JSON-RPC endpoint.
    pub fn rpc_env_var(self) -> &'static str {
        match self {
            Chain::Base => "BASE_RPC_URL",
            Chain::Lens => "LENS_RPC_URL",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base" => Ok(Chain::Base),
            "lens" => Ok(Chain::Lens),
            other => Err(anyhow!("Unknown chain: {other}")),
        }
    }
}
