use anyhow::{Context, Result};
use serde::Serialize;
use vex_core::config::Config;
use vex_core::providers::ProviderManager;
use vex_core::{ChainId, ContractReader, Fetcher, Pair, Token};

/// JSON view of a token as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct TokenView {
    pub chain_id: u64,
    pub address: String,
    pub decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&Token> for TokenView {
    fn from(token: &Token) -> Self {
        Self {
            chain_id: token.chain_id().id(),
            address: token.checksum_address(),
            decimals: token.decimals(),
            symbol: token.symbol().map(str::to_string),
            name: token.name().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReserveView {
    pub token: TokenView,
    pub raw: String,
    pub exact: String,
}

/// JSON view of a pair as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct PairView {
    pub address: String,
    pub swap_fee: String,
    pub reserves: [ReserveView; 2],
}

impl PairView {
    pub fn new(pair: &Pair) -> Result<Self> {
        let reserve = |amount: &vex_core::TokenAmount| -> Result<ReserveView> {
            Ok(ReserveView {
                token: amount.token().into(),
                raw: amount.raw().to_string(),
                exact: amount.to_exact()?,
            })
        };
        Ok(Self {
            address: pair.address().to_checksum(None),
            swap_fee: pair.swap_fee().to_string(),
            reserves: [reserve(pair.reserve0())?, reserve(pair.reserve1())?],
        })
    }
}

/// Fetcher plus the node connections it reads through.
pub struct App {
    fetcher: Fetcher,
    providers: ProviderManager,
}

impl App {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::from_config(config),
            providers: ProviderManager::new(config).context("failed to create providers")?,
        })
    }

    pub async fn token(
        &self,
        chain_id: ChainId,
        address: &str,
        symbol: Option<String>,
        name: Option<String>,
    ) -> Result<TokenView> {
        let provider = self.providers.require(chain_id)?;
        let token = fetch_token(
            &self.fetcher,
            chain_id,
            address,
            provider.as_ref(),
            symbol,
            name,
        )
        .await?;
        Ok((&token).into())
    }

    pub async fn pair(&self, chain_id: ChainId, token_a: &str, token_b: &str) -> Result<PairView> {
        let provider = self.providers.require(chain_id)?;
        let pair = fetch_pair(&self.fetcher, chain_id, token_a, token_b, provider.as_ref()).await?;
        PairView::new(&pair)
    }
}

pub async fn fetch_token<R: ContractReader + ?Sized>(
    fetcher: &Fetcher,
    chain_id: ChainId,
    address: &str,
    reader: &R,
    symbol: Option<String>,
    name: Option<String>,
) -> Result<Token> {
    fetcher
        .fetch_token_data(chain_id, address, reader, symbol, name)
        .await
        .with_context(|| format!("failed to fetch token {address}"))
}

/// Fetch both tokens, then the pair they form.
pub async fn fetch_pair<R: ContractReader + ?Sized>(
    fetcher: &Fetcher,
    chain_id: ChainId,
    token_a: &str,
    token_b: &str,
    reader: &R,
) -> Result<Pair> {
    let a = fetch_token(fetcher, chain_id, token_a, reader, None, None).await?;
    let b = fetch_token(fetcher, chain_id, token_b, reader, None, None).await?;
    fetcher
        .fetch_pair_data(&a, &b, reader)
        .await
        .with_context(|| format!("failed to fetch pair {token_a} / {token_b}"))
}
