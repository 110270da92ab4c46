use crate::cache::DecimalsCache;
use crate::chain::ChainId;
use crate::config::Config;
use crate::contracts::IVexchangeV2Pair;
use crate::pair::{Pair, PairAddressDeriver};
use crate::reader::{read_call, ContractReader};
use crate::token::Token;
use crate::token_amount::TokenAmount;
use crate::{Error, Result};
use alloy_primitives::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Builds tokens and pairs from on-chain data.
///
/// Holds no connection; every fetch takes the [`ContractReader`] to use.
/// The decimals cache is shared, so tokens fetched through
/// [`Token::fetch`] with [`Fetcher::cache`] and through
/// [`Fetcher::fetch_token_data`] see the same entries.
pub struct Fetcher {
    cache: Arc<DecimalsCache>,
    derivers: HashMap<ChainId, PairAddressDeriver>,
}

impl Fetcher {
    pub fn new(cache: Arc<DecimalsCache>) -> Self {
        Self {
            cache,
            derivers: HashMap::new(),
        }
    }

    /// A fetcher whose cache holds the legacy overrides plus those in `config`,
    /// able to locate pairs on every configured chain.
    pub fn from_config(config: &Config) -> Self {
        let cache = DecimalsCache::new();
        for o in &config.decimals_overrides {
            cache.insert(o.chain_id, o.address, o.decimals);
        }
        Self {
            cache: Arc::new(cache),
            derivers: config.pair_address_derivers(),
        }
    }

    pub fn with_pair_deriver(mut self, chain_id: ChainId, deriver: PairAddressDeriver) -> Self {
        self.derivers.insert(chain_id, deriver);
        self
    }

    pub fn cache(&self) -> Arc<DecimalsCache> {
        self.cache.clone()
    }

    /// Deterministic address of the pair holding both tokens.
    pub fn pair_address(&self, token_a: &Token, token_b: &Token) -> Result<Address> {
        let chain_id = token_a.chain_id();
        let deriver = self.derivers.get(&chain_id).ok_or_else(|| {
            Error::ConfigError(format!("no pair factory configured for chain {}", chain_id))
        })?;
        deriver.derive(token_a, token_b)
    }

    /// See [`Token::fetch`].
    pub async fn fetch_token_data<R>(
        &self,
        chain_id: ChainId,
        address: &str,
        reader: &R,
        symbol: Option<String>,
        name: Option<String>,
    ) -> Result<Token>
    where
        R: ContractReader + ?Sized,
    {
        Token::fetch(chain_id, address, reader, &self.cache, symbol, name).await
    }

    /// Read reserves and swap fee of the pair for `token_a` and `token_b`.
    ///
    /// Both tokens must live on the same chain; this is checked before any
    /// call is made. The reserves are assigned to the tokens in sort order.
    pub async fn fetch_pair_data<R>(
        &self,
        token_a: &Token,
        token_b: &Token,
        reader: &R,
    ) -> Result<Pair>
    where
        R: ContractReader + ?Sized,
    {
        if token_a.chain_id() != token_b.chain_id() {
            return Err(Error::ChainIdMismatch(
                token_a.chain_id().id(),
                token_b.chain_id().id(),
            ));
        }
        let pair_address = self.pair_address(token_a, token_b)?;
        debug!("Reading pair {} for {} / {}", pair_address, token_a, token_b);

        let (reserves, swap_fee) = futures::try_join!(
            read_call(reader, pair_address, IVexchangeV2Pair::getReservesCall {}),
            read_call(reader, pair_address, IVexchangeV2Pair::swapFeeCall {}),
        )?;

        let reserve0 = U256::from(reserves.reserve0.to::<u128>());
        let reserve1 = U256::from(reserves.reserve1.to::<u128>());
        let (balance_a, balance_b) = if token_a.sorts_before(token_b)? {
            (reserve0, reserve1)
        } else {
            (reserve1, reserve0)
        };

        Pair::new(
            pair_address,
            TokenAmount::new(token_a.clone(), balance_a),
            TokenAmount::new(token_b.clone(), balance_b),
            swap_fee,
        )
    }
}
