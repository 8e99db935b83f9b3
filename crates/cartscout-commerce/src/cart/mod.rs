//! Shopping cart module.
//!
//! Contains the cart, its entries and per-chain cart pricing.

mod cart;
mod pricing;

pub use cart::{parse_quantity, Cart, CartEntry, MAX_QUANTITY_PER_ITEM};
pub use pricing::{CartPricing, LinePricing};
