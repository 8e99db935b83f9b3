//! Stores, their locations and how they are found.

mod geo;
mod locator;
mod store;

pub use geo::GeoPoint;
pub use locator::{resolve_stores, FallbackReason, StoreLocator, StoreResolution, StoreSource};
pub use store::{
    assign_chains, fallback_stores, FallbackChain, Store, StoreCandidate, FALLBACK_STORE_ID,
    UNKNOWN_STORE_NAME,
};
