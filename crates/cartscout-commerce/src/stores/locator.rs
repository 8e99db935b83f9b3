//! Store locator contract and store resolution.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::catalog::PriceTable;
use crate::error::{CommerceError, LookupError};
use crate::stores::{assign_chains, fallback_stores, FallbackChain, GeoPoint, Store, StoreCandidate};

/// Finds supermarkets around a point.
#[async_trait]
pub trait StoreLocator: Send + Sync {
    /// Stores within `radius_m` metres of `origin`, in the locator's own order.
    async fn locate(
        &self,
        origin: GeoPoint,
        radius_m: u32,
    ) -> Result<Vec<StoreCandidate>, LookupError>;
}

/// Why the fallback store set was used.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The locator failed.
    LookupFailed(LookupError),
    /// The locator returned nothing inside the radius.
    NoResults,
    /// No locator was consulted.
    Offline,
}

/// Where the resolved stores came from.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreSource {
    /// Real stores from the locator.
    Located,
    /// The deterministic substitute set.
    Fallback(FallbackReason),
}

impl StoreSource {
    /// Check if the fallback set was substituted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, StoreSource::Fallback(_))
    }
}

/// Stores ready for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResolution {
    /// Stores with assigned chains, never empty.
    pub stores: Vec<Store>,
    /// Origin of the store list.
    pub source: StoreSource,
}

impl StoreResolution {
    /// The fallback set without consulting any locator.
    pub fn offline(origin: GeoPoint, prices: &PriceTable) -> Result<Self, CommerceError> {
        Self::fallback(origin, prices, FallbackReason::Offline)
    }

    fn fallback(
        origin: GeoPoint,
        prices: &PriceTable,
        reason: FallbackReason,
    ) -> Result<Self, CommerceError> {
        Ok(Self {
            stores: fallback_stores(origin, prices)?,
            source: StoreSource::Fallback(reason),
        })
    }
}

/// Ask the locator for stores and turn them into priceable [`Store`]s.
///
/// Locator failures and empty results are not errors: the fallback store set
/// is substituted and the reason recorded in [`StoreResolution::source`].
/// Only an unusable price table (no chains, unknown fixed chain) fails.
///
/// Candidates are kept when their reported location lies within `radius_m`
/// of `origin`. For areas that location is the centre, so a large building the
/// locator matched by its outline can still be dropped here. A repeated id
/// keeps only its first candidate.
pub async fn resolve_stores(
    locator: &dyn StoreLocator,
    origin: GeoPoint,
    radius_m: u32,
    prices: &PriceTable,
    policy: &FallbackChain,
) -> Result<StoreResolution, CommerceError> {
    let candidates = match locator.locate(origin, radius_m).await {
        Ok(candidates) => candidates,
        Err(e) => return StoreResolution::fallback(origin, prices, FallbackReason::LookupFailed(e)),
    };

    let mut seen = HashSet::new();
    let in_range: Vec<StoreCandidate> = candidates
        .into_iter()
        .filter(|c| origin.distance_m(&c.location) <= f64::from(radius_m))
        .filter(|c| seen.insert(c.id))
        .collect();

    if in_range.is_empty() {
        return StoreResolution::fallback(origin, prices, FallbackReason::NoResults);
    }

    Ok(StoreResolution {
        stores: assign_chains(in_range, prices, policy)?,
        source: StoreSource::Located,
    })
}
