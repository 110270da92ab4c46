use crate::chain::ChainId;
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// A decimals value that is known up front instead of read from the token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalsOverride {
    pub chain_id: ChainId,
    pub address: Address,
    pub decimals: u8,
}

/// Tokens whose `decimals()` cannot be read through the standard ERC20 method.
///
/// DGD predates the `decimals` convention and is pinned to 9 on mainnet.
pub const LEGACY_DECIMALS_OVERRIDES: &[DecimalsOverride] = &[DecimalsOverride {
    chain_id: ChainId::Mainnet,
    address: address!("0xE0B7927c4aF23765Cb51314A0E0521A9645F0E2A"),
    decimals: 9,
}];

/// Process-wide map of `(chain, token address)` to decimals.
///
/// Entries are only ever added. Two fetches racing on the same key may both
/// write; the last write wins.
#[derive(Debug)]
pub struct DecimalsCache {
    entries: RwLock<HashMap<(ChainId, Address), u8>>,
}

impl DecimalsCache {
    /// A cache seeded with [`LEGACY_DECIMALS_OVERRIDES`].
    pub fn new() -> Self {
        Self::with_overrides(LEGACY_DECIMALS_OVERRIDES.iter().copied())
    }

    /// A cache with no entries at all, not even the legacy overrides.
    pub fn empty() -> Self {
        Self::with_overrides([])
    }

    /// A cache seeded with exactly the given entries.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = DecimalsOverride>,
    {
        let entries = overrides
            .into_iter()
            .map(|o| ((o.chain_id, o.address), o.decimals))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn get(&self, chain_id: ChainId, address: &Address) -> Option<u8> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(chain_id, *address))
            .copied()
    }

    /// Store `decimals` for the token, returning the previous value if any.
    pub fn insert(&self, chain_id: ChainId, address: Address, decimals: u8) -> Option<u8> {
        let previous = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((chain_id, address), decimals);

        match previous {
            Some(old) if old != decimals => warn!(
                "Decimals for {} on {} changed from {} to {}",
                address, chain_id, old, decimals
            ),
            _ => debug!("Cached decimals {} for {} on {}", decimals, address, chain_id),
        }
        previous
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DecimalsCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DGD: Address = address!("0xE0B7927c4aF23765Cb51314A0E0521A9645F0E2A");
    const OTHER: Address = address!("0x2222222222222222222222222222222222222222");

    #[test]
    fn new_cache_knows_dgd() {
        let cache = DecimalsCache::new();
        assert_eq!(cache.get(ChainId::Mainnet, &DGD), Some(9));
        assert_eq!(cache.get(ChainId::Testnet, &DGD), None);
        assert_eq!(cache.len(), LEGACY_DECIMALS_OVERRIDES.len());
    }

    #[test]
    fn default_cache_keeps_legacy_overrides() {
        let cache = DecimalsCache::default();
        assert_eq!(cache.get(ChainId::Mainnet, &DGD), Some(9));
        assert_eq!(cache.len(), DecimalsCache::new().len());
    }

    #[test]
    fn empty_cache_has_no_entries() {
        let cache = DecimalsCache::empty();
        assert!(cache.is_empty());
        assert_eq!(cache.get(ChainId::Mainnet, &DGD), None);
    }

    #[test]
    fn keys_are_per_chain() {
        let cache = DecimalsCache::empty();
        assert_eq!(cache.insert(ChainId::Mainnet, OTHER, 6), None);
        assert_eq!(cache.insert(ChainId::Testnet, OTHER, 18), None);

        assert_eq!(cache.get(ChainId::Mainnet, &OTHER), Some(6));
        assert_eq!(cache.get(ChainId::Testnet, &OTHER), Some(18));
    }

    #[test]
    fn last_write_wins() {
        let cache = DecimalsCache::empty();
        cache.insert(ChainId::Mainnet, OTHER, 6);
        assert_eq!(cache.insert(ChainId::Mainnet, OTHER, 8), Some(6));
        assert_eq!(cache.get(ChainId::Mainnet, &OTHER), Some(8));
        assert_eq!(cache.len(), 1);
    }
}
