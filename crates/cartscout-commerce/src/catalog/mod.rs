//! Product catalog module.
//!
//! Contains products, per-chain prices and the catalog file format.

mod data;
mod prices;
mod product;

pub use data::{CatalogData, ChainData};
pub use prices::{ChainPrices, PriceTable};
pub use product::{Catalog, Product};
