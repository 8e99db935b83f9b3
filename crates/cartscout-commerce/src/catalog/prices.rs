//! Per-chain unit prices.

use crate::error::CommerceError;
use crate::ids::{ChainKey, ProductId};
use crate::money::{Currency, Money};
use std::collections::HashMap;

/// Prices and name aliases for one supermarket chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainPrices {
    /// Chain key.
    pub chain: ChainKey,
    /// Lowercase spellings a store name may contain (e.g. "лидл").
    pub aliases: Vec<String>,
    prices: HashMap<ProductId, Money>,
}

impl ChainPrices {
    fn new(chain: ChainKey, aliases: Vec<String>) -> Self {
        let aliases = aliases.into_iter().map(|a| a.to_lowercase()).collect();
        Self {
            chain,
            aliases,
            prices: HashMap::new(),
        }
    }

    /// Unit price of a product at this chain.
    pub fn price(&self, product: ProductId) -> Option<Money> {
        self.prices.get(&product).copied()
    }

    /// Number of priced products.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Check if the chain prices nothing.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    fn matches(&self, lowercase_name: &str) -> bool {
        lowercase_name.contains(&self.chain.as_str().to_lowercase())
            || self.aliases.iter().any(|a| lowercase_name.contains(a.as_str()))
    }
}

/// Static reference prices: chain -> product -> unit price.
///
/// Chains keep their insertion order; it decides which chain wins when a store
/// name matches several, and the order of round-robin fallback assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    currency: Currency,
    chains: Vec<ChainPrices>,
}

impl PriceTable {
    /// Create an empty table in the given currency.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            chains: Vec::new(),
        }
    }

    /// Register a chain.
    pub fn add_chain(
        &mut self,
        chain: impl Into<ChainKey>,
        aliases: Vec<String>,
    ) -> Result<(), CommerceError> {
        let chain = chain.into();
        if self.chain(&chain).is_some() {
            return Err(CommerceError::DuplicateChain(chain.to_string()));
        }
        self.chains.push(ChainPrices::new(chain, aliases));
        Ok(())
    }

    /// Set the unit price of a product at a registered chain.
    pub fn set_price(
        &mut self,
        chain: &ChainKey,
        product: ProductId,
        price: Money,
    ) -> Result<(), CommerceError> {
        if price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: price.currency.code().to_string(),
            });
        }
        let entry = self
            .chains
            .iter_mut()
            .find(|c| &c.chain == chain)
            .ok_or_else(|| CommerceError::UnknownChain(chain.to_string()))?;
        entry.prices.insert(product, price);
        Ok(())
    }

    /// Unit price of a product at a chain, if that chain prices it.
    pub fn unit_price(&self, chain: &ChainKey, product: ProductId) -> Option<Money> {
        self.chain(chain).and_then(|c| c.price(product))
    }

    /// Look up a chain's prices.
    pub fn chain(&self, chain: &ChainKey) -> Option<&ChainPrices> {
        self.chains.iter().find(|c| &c.chain == chain)
    }

    /// Chain keys in table order.
    pub fn chain_keys(&self) -> impl Iterator<Item = &ChainKey> {
        self.chains.iter().map(|c| &c.chain)
    }

    /// All chains in table order.
    pub fn chains(&self) -> &[ChainPrices] {
        &self.chains
    }

    /// Check whether a chain is priced.
    pub fn contains_chain(&self, chain: &ChainKey) -> bool {
        self.chain(chain).is_some()
    }

    /// Find the first chain whose key or alias occurs in a store name.
    pub fn match_chain(&self, store_name: &str) -> Option<&ChainKey> {
        let name = store_name.to_lowercase();
        self.chains
            .iter()
            .find(|c| c.matches(&name))
            .map(|c| &c.chain)
    }

    /// Currency of every price in the table.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Number of chains.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Check if the table has no chains.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PriceTable {
        let mut table = PriceTable::new(Currency::BGN);
        table
            .add_chain("Lidl", vec!["lidl".into(), "лидл".into()])
            .unwrap();
        table
            .add_chain("Kaufland", vec!["Кауфланд".into()])
            .unwrap();
        table
            .set_price(&"Lidl".into(), ProductId::new(1), Money::new(220, Currency::BGN))
            .unwrap();
        table
    }

    #[test]
    fn test_unit_price_lookup() {
        let table = table();
        assert_eq!(
            table.unit_price(&"Lidl".into(), ProductId::new(1)),
            Some(Money::new(220, Currency::BGN))
        );
        assert_eq!(table.unit_price(&"Lidl".into(), ProductId::new(2)), None);
        assert_eq!(table.unit_price(&"Metro".into(), ProductId::new(1)), None);
    }

    #[test]
    fn test_match_chain_by_key_and_alias() {
        let table = table();
        assert_eq!(
            table.match_chain("LIDL Varna Mir"),
            Some(&ChainKey::from("Lidl"))
        );
        assert_eq!(
            table.match_chain("Кауфланд Девня"),
            Some(&ChainKey::from("Kaufland"))
        );
        assert_eq!(table.match_chain("Corner Shop"), None);
    }

    #[test]
    fn test_currency_must_match_table() {
        let mut table = table();
        let result = table.set_price(
            &"Lidl".into(),
            ProductId::new(2),
            Money::new(100, Currency::EUR),
        );
        assert!(matches!(result, Err(CommerceError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_duplicate_and_unknown_chain() {
        let mut table = table();
        assert_eq!(
            table.add_chain("Lidl", vec![]),
            Err(CommerceError::DuplicateChain("Lidl".to_string()))
        );
        assert_eq!(
            table.set_price(&"Metro".into(), ProductId::new(1), Money::new(1, Currency::BGN)),
            Err(CommerceError::UnknownChain("Metro".to_string()))
        );
    }
}
