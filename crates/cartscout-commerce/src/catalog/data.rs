//! Serializable catalog definition and the built-in reference data.

use crate::catalog::{Catalog, PriceTable, Product};
use crate::error::CommerceError;
use crate::ids::{ChainKey, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalog file contents: products plus per-chain prices.
///
/// Price maps are keyed by product id written as a string, which keeps the
/// same shape loadable from both JSON and TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogData {
    /// Currency of every price.
    #[serde(default)]
    pub currency: Currency,
    /// Products in display order.
    pub products: Vec<Product>,
    /// Chains in matching order.
    pub chains: Vec<ChainData>,
}

/// One chain in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChainData {
    /// Chain key.
    pub key: String,
    /// Alternative spellings matched against store names.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Product id -> unit price as a decimal.
    #[serde(default)]
    pub prices: BTreeMap<String, f64>,
}

impl CatalogData {
    /// Validate and split into the catalog and its price table.
    pub fn into_parts(self) -> Result<(Catalog, PriceTable), CommerceError> {
        let catalog = Catalog::new(self.products)?;
        let mut table = PriceTable::new(self.currency);

        for chain in self.chains {
            let key = ChainKey::new(chain.key);
            table.add_chain(key.clone(), chain.aliases)?;
            for (raw_id, price) in chain.prices {
                let id: u64 = raw_id.trim().parse().map_err(|_| {
                    CommerceError::SerializationError(format!(
                        "invalid product id {:?} in prices of {}",
                        raw_id, key
                    ))
                })?;
                let product_id = ProductId::new(id);
                if !catalog.contains(product_id) {
                    return Err(CommerceError::UnknownProduct {
                        chain: key.to_string(),
                        product_id: id,
                    });
                }
                if !valid_price(price, self.currency) {
                    return Err(CommerceError::InvalidPrice {
                        chain: key.to_string(),
                        product_id: id,
                        price,
                    });
                }
                table.set_price(&key, product_id, Money::from_decimal(price, self.currency))?;
            }
        }

        Ok((catalog, table))
    }

    /// Parse a JSON catalog file.
    pub fn from_json(content: &str) -> Result<Self, CommerceError> {
        Ok(serde_json::from_str(content)?)
    }

    /// The reference products and chain prices (BGN).
    pub fn builtin() -> Self {
        let products = [
            (1, "Milk (1 L)"),
            (2, "Bread (Loaf)"),
            (3, "Eggs (10 pack)"),
            (4, "Apples (1 kg)"),
            (5, "Chicken Breast (1 kg)"),
            (6, "Rice (1 kg)"),
        ]
        .into_iter()
        .map(|(id, name)| Product::new(id, name))
        .collect();

        let chains: [(&str, &[&str], [f64; 6]); 6] = [
            ("Lidl", &["lidl", "лидл"], [2.20, 1.50, 3.80, 1.80, 10.50, 2.80]),
            (
                "Kaufland",
                &["kaufland", "кауфланд", "кауфленд"],
                [2.15, 1.40, 3.70, 1.70, 10.20, 2.70],
            ),
            (
                "Billa",
                &["billa", "билла", "била"],
                [2.40, 1.80, 4.20, 2.00, 11.50, 3.20],
            ),
            ("Bulmag", &["bulmag", "булмаг"], [2.30, 1.60, 4.00, 1.90, 11.00, 3.00]),
            (
                "MyMarket",
                &["mymarket", "my market", "маймаркет", "май маркет"],
                [2.50, 1.90, 4.50, 2.20, 12.00, 3.50],
            ),
            ("Nablizo", &["nablizo", "наблизо"], [2.60, 2.00, 4.80, 2.50, 12.50, 3.80]),
        ];

        let chains = chains
            .into_iter()
            .map(|(key, aliases, prices)| ChainData {
                key: key.to_string(),
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
                prices: prices
                    .iter()
                    .enumerate()
                    .map(|(i, price)| ((i + 1).to_string(), *price))
                    .collect(),
            })
            .collect();

        Self {
            currency: Currency::BGN,
            products,
            chains,
        }
    }
}

/// Finite, not negative, and representable as whole minor units.
fn valid_price(price: f64, currency: Currency) -> bool {
    let limit = i64::MAX as f64 / 10_f64.powi(currency.decimal_places() as i32);
    price.is_finite() && price >= 0.0 && price < limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let (catalog, table) = CatalogData::builtin().into_parts().unwrap();
        assert_eq!(catalog.len(), 6);
        assert_eq!(table.len(), 6);
        assert_eq!(
            table.unit_price(&"Kaufland".into(), ProductId::new(2)),
            Some(Money::new(140, Currency::BGN))
        );
        assert_eq!(
            table.unit_price(&"Nablizo".into(), ProductId::new(5)),
            Some(Money::new(1250, Currency::BGN))
        );
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "products": [{"id": 1, "name": "Milk"}, {"id": 2, "name": "Bread"}],
            "chains": [
                {"key": "Lidl", "prices": {"1": 2.20, "2": 1.50}},
                {"key": "Kaufland", "aliases": ["кауфланд"], "prices": {"1": 2.15}}
            ]
        }"#;
        let (catalog, table) = CatalogData::from_json(json).unwrap().into_parts().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(table.currency(), Currency::BGN);
        assert_eq!(table.unit_price(&"Kaufland".into(), ProductId::new(2)), None);
    }

    #[test]
    fn test_from_toml() {
        let content = r#"
            currency = "BGN"
            products = [{ id = 1, name = "Milk" }]

            [[chains]]
            key = "Billa"
            [chains.prices]
            1 = 2.40
        "#;
        let data: CatalogData = toml::from_str(content).unwrap();
        let (_, table) = data.into_parts().unwrap();
        assert_eq!(
            table.unit_price(&"Billa".into(), ProductId::new(1)),
            Some(Money::new(240, Currency::BGN))
        );
    }

    #[test]
    fn test_price_for_unknown_product_rejected() {
        let json = r#"{
            "products": [{"id": 1, "name": "Milk"}],
            "chains": [{"key": "Lidl", "prices": {"9": 1.0}}]
        }"#;
        let result = CatalogData::from_json(json).unwrap().into_parts();
        assert_eq!(
            result.unwrap_err(),
            CommerceError::UnknownProduct {
                chain: "Lidl".to_string(),
                product_id: 9
            }
        );
    }

    #[test]
    fn test_malformed_product_key_rejected() {
        let json = r#"{
            "products": [{"id": 1, "name": "Milk"}],
            "chains": [{"key": "Lidl", "prices": {"milk": 1.0}}]
        }"#;
        let result = CatalogData::from_json(json).unwrap().into_parts();
        assert!(matches!(result, Err(CommerceError::SerializationError(_))));
    }

    #[test]
    fn test_unusable_prices_rejected() {
        for price in ["-1.20", "nan", "inf", "1e300"] {
            let content = format!(
                "products = [{{ id = 1, name = \"Milk\" }}]\n\n[[chains]]\nkey = \"Lidl\"\n[chains.prices]\n1 = {}\n",
                price
            );
            let data: CatalogData = toml::from_str(&content).unwrap();
            let result = data.into_parts();
            assert!(
                matches!(
                    result,
                    Err(CommerceError::InvalidPrice { ref chain, product_id: 1, .. }) if chain == "Lidl"
                ),
                "price {} was accepted",
                price
            );
        }

        let free = r#"{
            "products": [{"id": 1, "name": "Milk"}],
            "chains": [{"key": "Lidl", "prices": {"1": 0.0}}]
        }"#;
        assert!(CatalogData::from_json(free).unwrap().into_parts().is_ok());
    }
}
