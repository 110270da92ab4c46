use crate::cache::DecimalsCache;
use crate::chain::ChainId;
use crate::contracts::IERC20;
use crate::reader::{read_call, ContractReader};
use crate::utils::{checksum, parse_address};
use crate::{Error, Result};
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Wrapped VET, deployed at the same address on mainnet and testnet.
pub const WVET_ADDRESS: Address = address!("0xD8CCDD85abDbF68DFEc95f06c973e87B1b5A9997");

/// An ERC20 token on a specific chain.
///
/// Identity is `(chain_id, address)`: `==` and `Hash` look at nothing else.
/// Use [`Token::equals`] to also check that the metadata agrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    chain_id: ChainId,
    address: Address,
    decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Token {
    /// Create a token from an address string and any integer decimals value.
    ///
    /// Fails with [`Error::InvalidAddress`] if the address is malformed or has a
    /// bad checksum, and with [`Error::InvalidDecimals`] if `decimals` is outside
    /// `0..=255`.
    pub fn new<D>(
        chain_id: ChainId,
        address: &str,
        decimals: D,
        symbol: Option<String>,
        name: Option<String>,
    ) -> Result<Self>
    where
        D: TryInto<u8> + Copy + fmt::Display,
    {
        let decimals = decimals
            .try_into()
            .map_err(|_| Error::InvalidDecimals(decimals.to_string()))?;
        let address = parse_address(address)?;
        Ok(Self::from_address(chain_id, address, decimals, symbol, name))
    }

    pub fn from_address(
        chain_id: ChainId,
        address: Address,
        decimals: u8,
        symbol: Option<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol,
            name,
        }
    }

    /// Build a token, reading `decimals()` from the contract unless `cache`
    /// already knows it. A successful read is stored in `cache`.
    ///
    /// Concurrent misses on the same token are not coalesced; each one issues
    /// its own call.
    pub async fn fetch<R>(
        chain_id: ChainId,
        address: &str,
        reader: &R,
        cache: &DecimalsCache,
        symbol: Option<String>,
        name: Option<String>,
    ) -> Result<Self>
    where
        R: ContractReader + ?Sized,
    {
        let address = parse_address(address)?;

        let decimals = match cache.get(chain_id, &address) {
            Some(decimals) => {
                debug!("Decimals cache hit for {} on {}", address, chain_id);
                decimals
            }
            None => {
                debug!("Reading decimals() of {} on {}", address, chain_id);
                let decimals = read_call(reader, address, IERC20::decimalsCall {}).await?;
                cache.insert(chain_id, address, decimals);
                decimals
            }
        };

        Ok(Self::from_address(chain_id, address, decimals, symbol, name))
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The EIP-55 form of the address.
    pub fn checksum_address(&self) -> String {
        checksum(&self.address)
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether both tokens are the same contract on the same chain.
    ///
    /// Two tokens that are the same contract must agree on decimals, and on
    /// symbol and name where both carry them. Disagreement means one of them
    /// was built from bad data and yields [`Error::Inconsistent`].
    pub fn equals(&self, other: &Token) -> Result<bool> {
        if self != other {
            return Ok(false);
        }
        if self.decimals != other.decimals {
            return Err(Error::Inconsistent(format!(
                "decimals of {} differ: {} != {}",
                self.address, self.decimals, other.decimals
            )));
        }
        if let (Some(a), Some(b)) = (&self.symbol, &other.symbol) {
            if a != b {
                return Err(Error::Inconsistent(format!(
                    "symbol of {} differs: {} != {}",
                    self.address, a, b
                )));
            }
        }
        if let (Some(a), Some(b)) = (&self.name, &other.name) {
            if a != b {
                return Err(Error::Inconsistent(format!(
                    "name of {} differs: {} != {}",
                    self.address, a, b
                )));
            }
        }
        Ok(true)
    }

    /// Whether this token comes first in a pair, ordering by lowercase address.
    ///
    /// Only tokens on the same chain with different addresses can be ordered.
    pub fn sorts_before(&self, other: &Token) -> Result<bool> {
        if self.chain_id != other.chain_id {
            return Err(Error::ChainIdMismatch(
                self.chain_id.id(),
                other.chain_id.id(),
            ));
        }
        if self.address == other.address {
            return Err(Error::Inconsistent(format!(
                "cannot order {} against itself",
                self.address
            )));
        }
        // byte order is the order of the lowercase hex strings
        Ok(self.address.as_slice() < other.address.as_slice())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{} ({})", symbol, self.checksum_address()),
            None => write!(f, "{}", self.checksum_address()),
        }
    }
}

/// The wrapped native token of `chain_id`.
pub fn wvet(chain_id: ChainId) -> Token {
    Token::from_address(
        chain_id,
        WVET_ADDRESS,
        18,
        Some("WVET".to_string()),
        Some("Wrapped VET".to_string()),
    )
}
