use crate::cache::DecimalsOverride;
use crate::chain::ChainId;
use crate::pair::PairAddressDeriver;
use crate::{Error, Result};
use alloy_primitives::{Address, B256};
use config::{Config as ConfigLib, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Timeout used when an rpc url comes from `rpc_urls` for a chain without an `rpc` section.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Clone)]
pub struct RpcConfig {
    pub url: String,
    pub timeout_secs: u64,
}

/// Everything needed to work with one network.
#[derive(Debug, Deserialize, Clone)]
pub struct ChainConfig {
    pub chain_id: ChainId,
    /// Pair factory used for CREATE2 pair addresses.
    pub factory_address: Address,
    /// keccak256 of the pair contract creation code.
    pub init_code_hash: B256,
    pub rpc: Option<RpcConfig>,
}

impl ChainConfig {
    pub fn pair_address_deriver(&self) -> PairAddressDeriver {
        PairAddressDeriver::new(self.factory_address, self.init_code_hash)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub chains: Vec<ChainConfig>,
    /// Extra decimals overrides on top of the built-in legacy ones.
    #[serde(default)]
    pub decimals_overrides: Vec<DecimalsOverride>,
    /// Rpc urls keyed by chain name (`mainnet`, `testnet`) or id. They replace
    /// the url of the matching `[[chains]]` entry, which makes them the place
    /// for environment overrides such as `VEX__RPC_URLS__MAINNET`.
    #[serde(default)]
    pub rpc_urls: HashMap<String, String>,
}

impl Config {
    pub fn chain(&self, chain_id: ChainId) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    pub fn pair_address_derivers(&self) -> HashMap<ChainId, PairAddressDeriver> {
        self.chains
            .iter()
            .map(|c| (c.chain_id, c.pair_address_deriver()))
            .collect()
    }

    /// Move every `rpc_urls` entry onto its chain.
    pub fn apply_rpc_urls(&mut self) -> Result<()> {
        for (key, url) in std::mem::take(&mut self.rpc_urls) {
            let chain_id: ChainId = key.parse()?;
            let chain = self
                .chains
                .iter_mut()
                .find(|c| c.chain_id == chain_id)
                .ok_or_else(|| {
                    Error::ConfigError(format!("rpc url given for unconfigured chain {}", chain_id))
                })?;

            match chain.rpc.as_mut() {
                Some(rpc) => rpc.url = url,
                None => {
                    chain.rpc = Some(RpcConfig {
                        url,
                        timeout_secs: DEFAULT_TIMEOUT_SECS,
                    })
                }
            }
        }
        Ok(())
    }

    /// Reject configurations that would produce meaningless pair addresses.
    pub fn validate(&self) -> Result<()> {
        let mut seen = Vec::with_capacity(self.chains.len());
        for chain in &self.chains {
            if seen.contains(&chain.chain_id) {
                return Err(Error::ConfigError(format!(
                    "chain {} is configured twice",
                    chain.chain_id
                )));
            }
            seen.push(chain.chain_id);

            if chain.factory_address == Address::ZERO {
                return Err(Error::ConfigError(format!(
                    "factory_address for chain {} is not set",
                    chain.chain_id
                )));
            }
            if chain.init_code_hash == B256::ZERO {
                return Err(Error::ConfigError(format!(
                    "init_code_hash for chain {} is not set",
                    chain.chain_id
                )));
            }
        }
        Ok(())
    }
}

/// Load configuration from `path`, letting `VEX__*` environment variables
/// override file values. Only top-level keys can be overridden this way,
/// e.g. `VEX__RPC_URLS__MAINNET=http://node:8669`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    load_config_with_env(path, Environment::with_prefix("VEX").separator("__"))
}

fn load_config_with_env<P: AsRef<Path>>(path: P, env: Environment) -> Result<Config> {
    let config = ConfigLib::builder()
        .add_source(File::from(path.as_ref()))
        .add_source(env)
        .build()?;

    let mut config: Config = config.try_deserialize()?;
    config.apply_rpc_urls()?;
    config.validate()?;
    Ok(config)
}

/// Creates a default config file if it doesn't exist
pub fn ensure_default_config() -> Result<()> {
    let config_dir = Path::new("config");
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir)?;
    }

    let default_config_path = config_dir.join("default.toml");
    if !default_config_path.exists() {
        std::fs::write(default_config_path, DEFAULT_CONFIG)?;
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"
# vex-fetch Default Configuration
#
# Fill in the pair factory deployed on each chain and the keccak256 hash of
# its pair creation code. Zero values are rejected on load.

[[chains]]
chain_id = 74  # mainnet
factory_address = "0x0000000000000000000000000000000000000000"
init_code_hash = "0x0000000000000000000000000000000000000000000000000000000000000000"

[chains.rpc]
url = "http://127.0.0.1:8545"
timeout_secs = 30

# Rpc url per chain, overridable with VEX__RPC_URLS__MAINNET
# [rpc_urls]
# mainnet = "http://127.0.0.1:8669"

# Tokens whose decimals() cannot be read on chain
# [[decimals_overrides]]
# chain_id = 74
# address = "0x..."
# decimals = 9
"#;
