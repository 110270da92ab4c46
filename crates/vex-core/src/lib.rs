pub mod cache;
pub mod chain;
pub mod config;
pub mod contracts;
pub mod error;
pub mod fetcher;
pub mod pair;
pub mod providers;
pub mod reader;
pub mod token;
pub mod token_amount;
pub mod utils;

pub use cache::{DecimalsCache, DecimalsOverride, LEGACY_DECIMALS_OVERRIDES};
pub use chain::ChainId;
pub use error::Error;
pub use fetcher::Fetcher;
pub use pair::{Pair, PairAddressDeriver};
pub use reader::{read_call, ContractReader};
pub use token::{wvet, Token, WVET_ADDRESS};
pub use token_amount::TokenAmount;

pub use alloy_primitives::Address;

pub type Result<T, E = Error> = std::result::Result<T, E>;
