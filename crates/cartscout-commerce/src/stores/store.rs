//! Store records and chain assignment.

use crate::catalog::PriceTable;
use crate::error::CommerceError;
use crate::ids::{ChainKey, StoreId};
use crate::stores::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used for located shops without a name tag.
pub const UNKNOWN_STORE_NAME: &str = "Unknown Supermarket";

/// Id of the substitute store used when no real stores are available.
pub const FALLBACK_STORE_ID: StoreId = StoreId::new(999);

/// Chain preferred for the substitute store.
const FALLBACK_STORE_CHAIN: &str = "Lidl";

/// A supermarket with a priceable chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Store {
    /// Store identifier.
    pub id: StoreId,
    /// Display name.
    pub name: String,
    /// Chain whose prices apply here.
    pub chain: ChainKey,
    /// Where the store is.
    pub location: GeoPoint,
}

/// A supermarket as reported by a locator, before chain assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreCandidate {
    /// Locator's identifier.
    pub id: StoreId,
    /// Name, when the locator knows one.
    pub name: Option<String>,
    /// Where the store is.
    pub location: GeoPoint,
}

/// Chain given to stores whose name matches no priced chain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FallbackChain {
    /// Cycle through the price table's chains in table order.
    #[default]
    RoundRobin,
    /// Always use this chain.
    Fixed(ChainKey),
}

impl FallbackChain {
    /// Parse a config value: "round-robin", "fixed:<chain>" or a bare chain key.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "round-robin" | "round_robin" => FallbackChain::RoundRobin,
            other => {
                let chain = other.strip_prefix("fixed:").unwrap_or(other).trim();
                FallbackChain::Fixed(ChainKey::new(chain))
            }
        }
    }
}

impl fmt::Display for FallbackChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackChain::RoundRobin => write!(f, "round-robin"),
            FallbackChain::Fixed(chain) => write!(f, "{}", chain),
        }
    }
}

/// Give every candidate a chain from the price table.
///
/// Names are matched against chain keys and aliases first; the rest get the
/// fallback chain, so the result is deterministic for a given input order.
pub fn assign_chains(
    candidates: Vec<StoreCandidate>,
    prices: &PriceTable,
    policy: &FallbackChain,
) -> Result<Vec<Store>, CommerceError> {
    let chains: Vec<&ChainKey> = prices.chain_keys().collect();
    if chains.is_empty() {
        return Err(CommerceError::NoChains);
    }
    if let FallbackChain::Fixed(chain) = policy {
        if !prices.contains_chain(chain) {
            return Err(CommerceError::UnknownChain(chain.to_string()));
        }
    }

    let mut unmatched = 0usize;
    let stores = candidates
        .into_iter()
        .map(|candidate| {
            let name = candidate
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_STORE_NAME.to_string());

            let chain = match prices.match_chain(&name) {
                Some(chain) => chain.clone(),
                None => {
                    let chain = match policy {
                        FallbackChain::RoundRobin => chains[unmatched % chains.len()].clone(),
                        FallbackChain::Fixed(chain) => chain.clone(),
                    };
                    unmatched += 1;
                    chain
                }
            };

            Store {
                id: candidate.id,
                name,
                chain,
                location: candidate.location,
            }
        })
        .collect();

    Ok(stores)
}

/// The substitute store set used when the locator has nothing.
///
/// A single store just north-east of the origin, priced as Lidl when the table
/// has Lidl and as its first chain otherwise.
pub fn fallback_stores(origin: GeoPoint, prices: &PriceTable) -> Result<Vec<Store>, CommerceError> {
    let preferred = ChainKey::from(FALLBACK_STORE_CHAIN);
    let chain = if prices.contains_chain(&preferred) {
        preferred
    } else {
        prices.chain_keys().next().cloned().ok_or(CommerceError::NoChains)?
    };

    Ok(vec![Store {
        id: FALLBACK_STORE_ID,
        name: format!("Test Store ({})", chain),
        chain,
        location: origin.offset(0.001, 0.001),
    }])
}
