//! Shopping-list price comparison for cartscout.
//!
//! This crate holds the comparison core; network access lives behind the
//! [`StoreLocator`](stores::StoreLocator) and [`RoutePlanner`](routing::RoutePlanner)
//! traits:
//!
//! - **Catalog**: products and per-chain unit prices
//! - **Cart**: the shopping list and per-chain cart pricing
//! - **Stores**: located supermarkets, chain assignment, fallback stores
//! - **Ranking**: per-store totals sorted and classified
//! - **Split**: advice on buying at two stores
//! - **Session**: ties the above together and plans routes
//!
//! # Example
//!
//! ```rust
//! use cartscout_commerce::prelude::*;
//!
//! let (catalog, prices) = CatalogData::builtin().into_parts().unwrap();
//! let origin = GeoPoint::new(43.2141, 27.9147);
//! let stores = StoreResolution::offline(origin, &prices).unwrap();
//!
//! let mut session = ShoppingSession::new(catalog, prices, origin, stores);
//! session.add("milk", 2).unwrap();
//!
//! let comparison = session.comparison().unwrap();
//! println!("{}", comparison.recommendation());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod ranking;
pub mod routing;
pub mod session;
pub mod split;
pub mod stores;

pub use error::{CommerceError, LookupError};
pub use ids::*;
pub use money::{Currency, Money, BGN_PER_EUR};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, LookupError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money, BGN_PER_EUR};

    // Catalog
    pub use crate::catalog::{Catalog, CatalogData, PriceTable, Product};

    // Cart
    pub use crate::cart::{parse_quantity, Cart, CartEntry, CartPricing};

    // Stores
    pub use crate::stores::{
        resolve_stores, FallbackChain, GeoPoint, Store, StoreCandidate, StoreLocator,
        StoreResolution, StoreSource,
    };

    // Ranking
    pub use crate::ranking::{rank, PriceClass, RankedStore, Ranking, StoreTotal};

    // Split
    pub use crate::split::{advise, SplitAdvice, SplitProposal, SplitStrategy};

    // Routing
    pub use crate::routing::{resolve_distances, DistanceStatus, Route, RoutePlanner};

    // Session
    pub use crate::session::{CartChange, Comparison, RoutePlan, ShoppingSession};
}
