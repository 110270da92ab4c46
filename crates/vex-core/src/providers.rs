use crate::chain::ChainId;
use crate::config::{Config, RpcConfig};
use crate::error::Error;
use crate::reader::ContractReader;
use crate::Result;
use alloy_network::Ethereum;
use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_transport_http::Http;
use async_trait::async_trait;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A JSON-RPC connection to one node
pub struct RpcProvider {
    provider: Arc<RootProvider<Ethereum>>,
    chain_id: ChainId,
}

impl RpcProvider {
    /// Create a new provider from the given configuration
    pub fn new(config: &RpcConfig, chain_id: ChainId) -> Result<Self, Error> {
        let url = config
            .url
            .parse::<Url>()
            .map_err(|e| Error::ProviderError(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::ProviderError(e.to_string()))?;

        let rpc_client = RpcClient::new(Http::with_client(client, url), false);
        let provider = Arc::new(RootProvider::<Ethereum>::new(rpc_client));

        Ok(Self { provider, chain_id })
    }

    /// Get the chain ID
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}

#[async_trait]
impl ContractReader for RpcProvider {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        debug!("eth_call to {} on {}", to, self.chain_id);
        let tx = TransactionRequest::default()
            .to(to)
            .input(TransactionInput::new(data));

        self.provider
            .call(tx)
            .await
            .map_err(|e| Error::RpcError(e.to_string()))
    }
}

/// ProviderManager handles one provider per configured chain
#[derive(Default)]
pub struct ProviderManager {
    providers: HashMap<ChainId, Arc<RpcProvider>>,
}

impl ProviderManager {
    /// Create providers for every chain in `config` that has an `rpc` section
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut providers = HashMap::new();
        for chain in &config.chains {
            if let Some(rpc) = &chain.rpc {
                providers.insert(
                    chain.chain_id,
                    Arc::new(RpcProvider::new(rpc, chain.chain_id)?),
                );
            }
        }
        Ok(Self { providers })
    }

    /// Get a provider by chain ID
    pub fn by_chain_id(&self, chain_id: ChainId) -> Option<Arc<RpcProvider>> {
        self.providers.get(&chain_id).cloned()
    }

    /// Get a provider by chain ID, failing if none is configured
    pub fn require(&self, chain_id: ChainId) -> Result<Arc<RpcProvider>> {
        self.by_chain_id(chain_id).ok_or_else(|| {
            Error::ConfigError(format!("no rpc endpoint configured for chain {}", chain_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc(url: &str) -> RpcConfig {
        RpcConfig {
            url: url.to_string(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn rejects_bad_url() {
        assert!(matches!(
            RpcProvider::new(&rpc("not a url"), ChainId::Mainnet),
            Err(Error::ProviderError(_))
        ));
    }

    #[tokio::test]
    async fn keeps_chain_id() {
        let provider = RpcProvider::new(&rpc("http://127.0.0.1:8669"), ChainId::Testnet).unwrap();
        assert_eq!(provider.chain_id(), ChainId::Testnet);
    }

    #[test]
    fn missing_chain_is_a_config_error() {
        let manager = ProviderManager::default();
        assert!(manager.by_chain_id(ChainId::Mainnet).is_none());
        assert!(matches!(
            manager.require(ChainId::Mainnet),
            Err(Error::ConfigError(_))
        ));
    }
}
