//! Cart pricing at a single chain.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Price of the whole cart at one chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of priced lines; unpriced lines add nothing.
    pub total: Money,
    /// Number of entries the chain has no price for.
    pub missing: usize,
    /// Per-entry breakdown, in cart order.
    pub lines: Vec<LinePricing>,
}

/// Pricing of a single cart entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    /// Product priced.
    pub product_id: ProductId,
    /// Quantity in the cart.
    pub quantity: i64,
    /// Unit price, `None` when the chain does not carry the product.
    pub unit_price: Option<Money>,
    /// unit_price * quantity, or zero when unpriced.
    pub subtotal: Money,
}
