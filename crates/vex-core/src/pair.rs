use crate::chain::ChainId;
use crate::token::Token;
use crate::token_amount::TokenAmount;
use crate::{Error, Result};
use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};

/// CREATE2 parameters of a pair factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairAddressDeriver {
    pub factory: Address,
    pub init_code_hash: B256,
}

impl PairAddressDeriver {
    pub fn new(factory: Address, init_code_hash: B256) -> Self {
        Self {
            factory,
            init_code_hash,
        }
    }

    /// Address of the pair for two tokens, independent of argument order.
    pub fn derive(&self, token_a: &Token, token_b: &Token) -> Result<Address> {
        let (token0, token1) = if token_a.sorts_before(token_b)? {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        let salt = keccak256([token0.address().as_slice(), token1.address().as_slice()].concat());
        Ok(self.factory.create2(salt, self.init_code_hash))
    }
}

/// Reserves of an AMM pair together with its swap fee.
///
/// The amounts are stored in token order: `token0` sorts before `token1`.
/// Only [`Pair::new`] builds one, so the ordering always holds. For that
/// reason a pair cannot be deserialized:
///
/// ```compile_fail
/// let pair: vex_core::Pair = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Pair {
    address: Address,
    token_amounts: [TokenAmount; 2],
    swap_fee: U256,
}

impl Pair {
    pub fn new(
        address: Address,
        amount_a: TokenAmount,
        amount_b: TokenAmount,
        swap_fee: U256,
    ) -> Result<Self> {
        let token_amounts = if amount_a.token().sorts_before(amount_b.token())? {
            [amount_a, amount_b]
        } else {
            [amount_b, amount_a]
        };
        Ok(Self {
            address,
            token_amounts,
            swap_fee,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> ChainId {
        self.token0().chain_id()
    }

    pub fn token0(&self) -> &Token {
        self.token_amounts[0].token()
    }

    pub fn token1(&self) -> &Token {
        self.token_amounts[1].token()
    }

    pub fn reserve0(&self) -> &TokenAmount {
        &self.token_amounts[0]
    }

    pub fn reserve1(&self) -> &TokenAmount {
        &self.token_amounts[1]
    }

    pub fn swap_fee(&self) -> U256 {
        self.swap_fee
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        token == self.token0() || token == self.token1()
    }

    pub fn reserve_of(&self, token: &Token) -> Result<&TokenAmount> {
        if token.equals(self.token0())? {
            Ok(self.reserve0())
        } else if token.equals(self.token1())? {
            Ok(self.reserve1())
        } else {
            Err(Error::Inconsistent(format!(
                "{} is not part of pair {}",
                token, self.address
            )))
        }
    }

    /// The pair's own liquidity token.
    pub fn liquidity_token(&self) -> Token {
        Token::from_address(
            self.chain_id(),
            self.address,
            18,
            Some("VEX-V2".to_string()),
            Some("Vexchange V2".to_string()),
        )
    }
}
