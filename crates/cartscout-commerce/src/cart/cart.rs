//! Cart and cart entry types.

use crate::cart::{CartPricing, LinePricing};
use crate::catalog::{Catalog, PriceTable, Product};
use crate::error::CommerceError;
use crate::ids::{ChainKey, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per entry.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Coerce free-form quantity input to a positive integer.
///
/// Reads an optional sign and the leading digits, ignoring the rest
/// ("3 packs" is 3, "2.5" is 2). Anything that does not yield a positive
/// number becomes 1.
pub fn parse_quantity(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if negative || digits.is_empty() {
        return 1;
    }
    match digits.parse::<i64>() {
        Ok(0) => 1,
        Ok(n) => n,
        Err(_) => i64::MAX,
    }
}

/// One product on the shopping list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartEntry {
    /// The product.
    pub product: Product,
    /// Quantity, always at least 1.
    pub quantity: i64,
}

impl CartEntry {
    /// Product id of this entry.
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }
}

/// The shopping list: ordered, one entry per product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `query` against the catalog and add `quantity` of it.
    ///
    /// Re-adding a product increments its existing entry. On error the cart
    /// is left unchanged.
    pub fn add(
        &mut self,
        catalog: &Catalog,
        query: &str,
        quantity: i64,
    ) -> Result<&CartEntry, CommerceError> {
        let product = catalog.resolve(query)?.clone();
        self.add_product(product, quantity)
    }

    /// Add an already resolved product.
    pub fn add_product(
        &mut self,
        product: Product,
        quantity: i64,
    ) -> Result<&CartEntry, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if let Some(index) = self.position(product.id) {
            let existing = &mut self.entries[index];
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            existing.quantity = new_quantity;
            return Ok(&self.entries[index]);
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        self.entries.push(CartEntry { product, quantity });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Set an entry's quantity. Zero or less removes the entry.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove(product_id));
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        match self.entries.iter_mut().find(|e| e.product.id == product_id) {
            Some(entry) => {
                entry.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a product's entry. Returns false if it was not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|e| e.product.id != product_id);
        self.entries.len() < len_before
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Get the entry for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product.id == product_id)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of units (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Price the whole cart at one chain.
    ///
    /// Entries the chain does not price contribute nothing to the total and are
    /// counted in `missing`.
    pub fn price_at(
        &self,
        prices: &PriceTable,
        chain: &ChainKey,
    ) -> Result<CartPricing, CommerceError> {
        let mut lines = Vec::with_capacity(self.entries.len());
        let mut total = Money::zero(prices.currency());
        let mut missing = 0;

        for entry in &self.entries {
            let unit_price = prices.unit_price(chain, entry.product.id);
            let subtotal = match unit_price {
                Some(price) => price
                    .try_multiply(entry.quantity)
                    .ok_or(CommerceError::Overflow)?,
                None => {
                    missing += 1;
                    Money::zero(prices.currency())
                }
            };
            total = total.try_add(&subtotal).ok_or(CommerceError::Overflow)?;
            lines.push(LinePricing {
                product_id: entry.product.id,
                quantity: entry.quantity,
                unit_price,
                subtotal,
            });
        }

        Ok(CartPricing {
            total,
            missing,
            lines,
        })
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.entries.iter().position(|e| e.product.id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Product::new(1, "Milk (1 L)"),
            Product::new(2, "Bread (Loaf)"),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(" 12 packs"), 12);
        assert_eq!(parse_quantity("2.5"), 2);
        assert_eq!(parse_quantity("+4"), 4);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("abc"), 1);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity("-2"), 1);
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let entry = cart.add(&catalog(), "milk", 2).unwrap();
        assert_eq!(entry.product_id(), ProductId::new(1));
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, "Milk (1 L)", 1).unwrap();
        cart.add(&catalog, "bread", 1).unwrap();
        cart.add(&catalog, "MILK", 2).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 3);
        assert_eq!(cart.entries()[0].product.id, ProductId::new(1));
    }

    #[test]
    fn test_add_unknown_product_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add(&catalog(), "bread", 1).unwrap();
        let before = cart.clone();

        let result = cart.add(&catalog(), "caviar", 1);
        assert!(matches!(result, Err(CommerceError::ProductNotFound(_))));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(&catalog(), "bread", 1).unwrap();
        assert!(!cart.remove(ProductId::new(42)));
        assert_eq!(cart.len(), 1);
        assert!(cart.remove(ProductId::new(2)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_to_zero_removes_entry() {
        let mut cart = Cart::new();
        cart.add(&catalog(), "milk", 3).unwrap();
        assert!(cart.update_quantity(ProductId::new(1), 0).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::new();
        let result = cart.add(&catalog(), "milk", MAX_QUANTITY_PER_ITEM + 1);
        assert!(result.is_err());

        cart.add(&catalog(), "milk", MAX_QUANTITY_PER_ITEM).unwrap();
        let result = cart.add(&catalog(), "milk", 1);
        assert!(matches!(
            result,
            Err(CommerceError::QuantityExceedsLimit(_, MAX_QUANTITY_PER_ITEM))
        ));
    }

    #[test]
    fn test_invalid_quantity() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(&catalog(), "milk", 0).unwrap_err(),
            CommerceError::InvalidQuantity(0)
        );
    }

    #[test]
    fn test_price_at_counts_missing() {
        let mut prices = PriceTable::new(Currency::BGN);
        prices.add_chain("Lidl", vec![]).unwrap();
        prices
            .set_price(&"Lidl".into(), ProductId::new(1), Money::new(220, Currency::BGN))
            .unwrap();

        let mut cart = Cart::new();
        cart.add(&catalog(), "milk", 2).unwrap();
        cart.add(&catalog(), "bread", 1).unwrap();

        let pricing = cart.price_at(&prices, &"Lidl".into()).unwrap();
        assert_eq!(pricing.total.amount_cents, 440);
        assert_eq!(pricing.missing, 1);
        assert_eq!(pricing.lines[1].unit_price, None);
    }
}
