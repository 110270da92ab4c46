use alloy_primitives::{address, b256, Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vex_core::contracts::{IVexchangeV2Pair, IERC20};
use vex_core::{
    ChainId, ContractReader, DecimalsCache, Error, Fetcher, PairAddressDeriver, Result, Token,
};

const FACTORY: Address = address!("0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f");
const TOKEN_A: &str = "0x1111111111111111111111111111111111111111";
const TOKEN_B: &str = "0x9999999999999999999999999999999999999999";

/// Canned node: answers `(contract, selector)` lookups and counts every call.
#[derive(Default)]
struct CountingNode {
    responses: HashMap<(Address, [u8; 4]), Bytes>,
    calls: AtomicUsize,
}

impl CountingNode {
    fn with<C: SolCall>(mut self, to: Address, output: impl SolValue) -> Self {
        self.responses
            .insert((to, C::SELECTOR), output.abi_encode().into());
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContractReader for CountingNode {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let selector: [u8; 4] = data[..4].try_into().unwrap();
        self.responses
            .get(&(to, selector))
            .cloned()
            .ok_or_else(|| Error::RpcError(format!("no contract at {to}")))
    }
}

fn fetcher() -> Fetcher {
    Fetcher::new(Arc::new(DecimalsCache::new())).with_pair_deriver(
        ChainId::Mainnet,
        PairAddressDeriver::new(
            FACTORY,
            b256!("0x96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f"),
        ),
    )
}

fn token(address: &str) -> Token {
    Token::new(ChainId::Mainnet, address, 18, None, None).unwrap()
}

#[tokio::test]
async fn fetch_token_data_builds_normalized_token() {
    let address = address!("0xD8CCDD85abDbF68DFEc95f06c973e87B1b5A9997");
    let node = CountingNode::default().with::<IERC20::decimalsCall>(address, U256::from(18));
    let fetcher = fetcher();

    let token = fetcher
        .fetch_token_data(
            ChainId::Mainnet,
            "0xd8ccdd85abdbf68dfec95f06c973e87b1b5a9997",
            &node,
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(token.decimals(), 18);
    assert_eq!(
        token.checksum_address(),
        "0xD8CCDD85abDbF68DFEc95f06c973e87B1b5A9997"
    );
    assert_eq!(token.symbol(), None);
    assert_eq!(token.name(), None);
}

#[tokio::test]
async fn second_fetch_is_served_from_cache() {
    let address = address!("0x9999999999999999999999999999999999999999");
    let node = CountingNode::default().with::<IERC20::decimalsCall>(address, U256::from(6));
    let fetcher = fetcher();

    for _ in 0..2 {
        let token = fetcher
            .fetch_token_data(ChainId::Mainnet, TOKEN_B, &node, Some("B".into()), None)
            .await
            .unwrap();
        assert_eq!(token.decimals(), 6);
    }
    assert_eq!(node.calls(), 1);
}

#[tokio::test]
async fn token_fetch_and_fetcher_share_one_cache() {
    let address = address!("0x9999999999999999999999999999999999999999");
    let node = CountingNode::default().with::<IERC20::decimalsCall>(address, U256::from(6));
    let fetcher = fetcher();

    Token::fetch(ChainId::Mainnet, TOKEN_B, &node, &fetcher.cache(), None, None)
        .await
        .unwrap();
    fetcher
        .fetch_token_data(ChainId::Mainnet, TOKEN_B, &node, None, None)
        .await
        .unwrap();

    assert_eq!(node.calls(), 1);
}

#[tokio::test]
async fn bad_address_fails_without_calls() {
    let node = CountingNode::default();
    let err = fetcher()
        .fetch_token_data(ChainId::Mainnet, "0x1234", &node, None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidAddress(_)));
    assert_eq!(node.calls(), 0);
}

#[tokio::test]
async fn fetch_pair_data_orders_reserves() {
    let fetcher = fetcher();
    let a = token(TOKEN_A);
    let b = token(TOKEN_B);
    assert!(a.sorts_before(&b).unwrap());

    let pair_address = fetcher.pair_address(&a, &b).unwrap();
    let node = CountingNode::default()
        .with::<IVexchangeV2Pair::getReservesCall>(
            pair_address,
            (U256::from(1000), U256::from(2000), U256::from(0)),
        )
        .with::<IVexchangeV2Pair::swapFeeCall>(pair_address, U256::from(3));

    let pair = fetcher.fetch_pair_data(&a, &b, &node).await.unwrap();
    assert_eq!(pair.address(), pair_address);
    assert_eq!(pair.reserve0().token(), &a);
    assert_eq!(pair.reserve0().raw(), U256::from(1000));
    assert_eq!(pair.reserve1().token(), &b);
    assert_eq!(pair.reserve1().raw(), U256::from(2000));
    assert_eq!(pair.swap_fee(), U256::from(3));
    assert_eq!(node.calls(), 2);

    // argument order does not change the result
    let swapped = fetcher.fetch_pair_data(&b, &a, &node).await.unwrap();
    assert_eq!(swapped.address(), pair.address());
    assert_eq!(swapped.reserve_of(&a).unwrap().raw(), U256::from(1000));
    assert_eq!(swapped.reserve_of(&b).unwrap().raw(), U256::from(2000));
}

#[tokio::test]
async fn cross_chain_pair_fails_without_calls() {
    let node = CountingNode::default();
    let a = token(TOKEN_A);
    let b = Token::new(ChainId::Testnet, TOKEN_B, 18, None, None).unwrap();

    let err = fetcher().fetch_pair_data(&a, &b, &node).await.unwrap_err();
    assert!(matches!(err, Error::ChainIdMismatch(74, 39)));
    assert_eq!(node.calls(), 0);
}

#[tokio::test]
async fn missing_pair_contract_propagates_rpc_error() {
    let node = CountingNode::default();
    let err = fetcher()
        .fetch_pair_data(&token(TOKEN_A), &token(TOKEN_B), &node)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RpcError(_)));
}
