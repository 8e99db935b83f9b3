//! Price ranking engine.
//!
//! Totals the cart at every store, sorts ascending and tags each store as
//! cheapest, most expensive or average.

mod class;
mod engine;

pub use class::PriceClass;
pub use engine::{rank, store_totals, RankedStore, Ranking, StoreTotal, NO_STORES_MESSAGE};
