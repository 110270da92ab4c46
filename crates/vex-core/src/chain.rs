use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Networks the fetcher knows about. Discriminants are the genesis chain tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum ChainId {
    Mainnet = 74,
    Testnet = 39,
}

impl ChainId {
    pub const ALL: [ChainId; 2] = [ChainId::Mainnet, ChainId::Testnet];

    pub fn id(self) -> u64 {
        self as u64
    }
}

impl TryFrom<u64> for ChainId {
    type Error = Error;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        match id {
            74 => Ok(ChainId::Mainnet),
            39 => Ok(ChainId::Testnet),
            other => Err(Error::UnsupportedChain(other)),
        }
    }
}

impl From<ChainId> for u64 {
    fn from(chain_id: ChainId) -> Self {
        chain_id.id()
    }
}

/// Accepts a network name (`mainnet`, `testnet`, any case) or a numeric id.
impl FromStr for ChainId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("mainnet") {
            return Ok(ChainId::Mainnet);
        }
        if s.eq_ignore_ascii_case("testnet") {
            return Ok(ChainId::Testnet);
        }
        let id = s
            .parse::<u64>()
            .map_err(|_| Error::ConfigError(format!("unknown chain {:?}", s)))?;
        ChainId::try_from(id)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainId::Mainnet => write!(f, "mainnet ({})", self.id()),
            ChainId::Testnet => write!(f, "testnet ({})", self.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_known_ids() {
        for chain in ChainId::ALL {
            assert_eq!(ChainId::try_from(chain.id()).unwrap(), chain);
        }
    }

    #[test]
    fn rejects_unknown_id() {
        assert!(matches!(
            ChainId::try_from(1),
            Err(Error::UnsupportedChain(1))
        ));
    }

    #[test]
    fn parses_names_and_ids() {
        assert_eq!("mainnet".parse::<ChainId>().unwrap(), ChainId::Mainnet);
        assert_eq!("TESTNET".parse::<ChainId>().unwrap(), ChainId::Testnet);
        assert_eq!("74".parse::<ChainId>().unwrap(), ChainId::Mainnet);
        assert!(matches!(
            "1".parse::<ChainId>(),
            Err(Error::UnsupportedChain(1))
        ));
        assert!(matches!(
            "ropsten".parse::<ChainId>(),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&ChainId::Mainnet).unwrap(), "74");
        let parsed: ChainId = serde_json::from_str("39").unwrap();
        assert_eq!(parsed, ChainId::Testnet);
    }
}
