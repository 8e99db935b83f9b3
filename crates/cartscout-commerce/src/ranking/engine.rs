//! Per-store cart totals and the price ranking.

use crate::cart::Cart;
use crate::catalog::PriceTable;
use crate::error::CommerceError;
use crate::money::Money;
use crate::ranking::PriceClass;
use crate::stores::{GeoPoint, Store};
use serde::{Deserialize, Serialize};

/// Shown instead of a ranking when there are no stores to compare.
pub const NO_STORES_MESSAGE: &str = "No supported stores found nearby.";

/// Cost of the whole cart at one store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreTotal {
    /// The store.
    pub store: Store,
    /// Sum over priced entries of unit price * quantity.
    pub total: Money,
    /// Entries without a price at this store.
    pub missing: usize,
}

impl StoreTotal {
    /// "3.55 BGN / €1.82".
    pub fn display_price(&self) -> String {
        self.total.display_dual()
    }

    /// "All items available" or "N items missing".
    pub fn availability(&self) -> String {
        if self.missing == 0 {
            "All items available".to_string()
        } else {
            format!("{} items missing", self.missing)
        }
    }
}

/// Compute the cart total at every store, in store order.
///
/// Stores with missing items are kept; the missing count is reported instead.
pub fn store_totals(
    cart: &Cart,
    stores: &[Store],
    prices: &PriceTable,
) -> Result<Vec<StoreTotal>, CommerceError> {
    stores
        .iter()
        .map(|store| {
            let pricing = cart.price_at(prices, &store.chain)?;
            Ok(StoreTotal {
                store: store.clone(),
                total: pricing.total,
                missing: pricing.missing,
            })
        })
        .collect()
}

/// A store's place in the ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedStore {
    /// 1-based position.
    pub rank: usize,
    /// The store's totals.
    #[serde(flatten)]
    pub total: StoreTotal,
    /// Price class.
    pub class: PriceClass,
}

impl RankedStore {
    /// The ranked store.
    pub fn store(&self) -> &Store {
        &self.total.store
    }

    /// Straight-line distance from `origin` in kilometres.
    pub fn straight_line_km(&self, origin: &GeoPoint) -> f64 {
        origin.distance_km(&self.total.store.location)
    }
}

/// Stores sorted by cart total, cheapest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ranking {
    entries: Vec<RankedStore>,
}

impl Ranking {
    /// All ranked stores, cheapest first.
    pub fn entries(&self) -> &[RankedStore] {
        &self.entries
    }

    /// Iterate ranked stores.
    pub fn iter(&self) -> impl Iterator<Item = &RankedStore> {
        self.entries.iter()
    }

    /// The top-ranked store.
    pub fn cheapest(&self) -> Option<&RankedStore> {
        self.entries.first()
    }

    /// Number of ranked stores.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there was nothing to rank.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rank stores by the cart's total price.
///
/// The sort is stable, so stores with equal totals keep their input order.
pub fn rank(cart: &Cart, stores: &[Store], prices: &PriceTable) -> Result<Ranking, CommerceError> {
    let mut totals = store_totals(cart, stores, prices)?;
    totals.sort_by_key(|t| t.total.amount_cents);

    let (min, max) = match (totals.first(), totals.last()) {
        (Some(first), Some(last)) => (first.total, last.total),
        _ => return Ok(Ranking::default()),
    };

    let entries = totals
        .into_iter()
        .enumerate()
        .map(|(i, total)| RankedStore {
            rank: i + 1,
            class: PriceClass::of(total.total, min, max),
            total,
        })
        .collect();

    Ok(Ranking { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Product};
    use crate::ids::{ProductId, StoreId};
    use crate::money::Currency;

    fn catalog() -> Catalog {
        Catalog::new(vec![Product::new(1, "Milk"), Product::new(2, "Bread")]).unwrap()
    }

    fn prices(rows: &[(&str, &[(u64, i64)])]) -> PriceTable {
        let mut table = PriceTable::new(Currency::BGN);
        for (chain, items) in rows {
            table.add_chain(*chain, vec![]).unwrap();
            for (product, cents) in items.iter() {
                table
                    .set_price(
                        &(*chain).into(),
                        ProductId::new(*product),
                        Money::new(*cents, Currency::BGN),
                    )
                    .unwrap();
            }
        }
        table
    }

    fn count_class(ranking: &Ranking, class: PriceClass) -> usize {
        ranking.iter().filter(|e| e.class == class).count()
    }

    fn store(id: u64, chain: &str) -> Store {
        Store {
            id: StoreId::new(id),
            name: chain.to_string(),
            chain: chain.into(),
            location: GeoPoint::new(43.2, 27.9),
        }
    }

    fn milk_and_bread() -> Cart {
        let mut cart = Cart::new();
        cart.add(&catalog(), "Milk", 1).unwrap();
        cart.add(&catalog(), "Bread", 1).unwrap();
        cart
    }

    #[test]
    fn test_lidl_vs_kaufland() {
        let prices = prices(&[
            ("Lidl", &[(1, 220), (2, 150)]),
            ("Kaufland", &[(1, 215), (2, 140)]),
        ]);
        let stores = vec![store(1, "Lidl"), store(2, "Kaufland")];

        let ranking = rank(&milk_and_bread(), &stores, &prices).unwrap();
        let first = &ranking.entries()[0];
        let second = &ranking.entries()[1];

        assert_eq!(first.store().id, StoreId::new(2));
        assert_eq!(first.total.total.amount_cents, 355);
        assert_eq!(first.class, PriceClass::Cheapest);
        assert_eq!(second.store().id, StoreId::new(1));
        assert_eq!(second.total.total.amount_cents, 370);
        assert_eq!(second.class, PriceClass::MostExpensive);
        assert_eq!(first.total.display_price(), "3.55 BGN / \u{20ac}1.82");
    }

    #[test]
    fn test_missing_price_counts_and_contributes_nothing() {
        let prices = prices(&[("Lidl", &[(1, 220)])]);
        let totals = store_totals(&milk_and_bread(), &[store(1, "Lidl")], &prices).unwrap();
        assert_eq!(totals[0].missing, 1);
        assert_eq!(totals[0].total.amount_cents, 220);
        assert_eq!(totals[0].availability(), "1 items missing");
    }

    #[test]
    fn test_all_equal_totals_are_all_cheapest() {
        let prices = prices(&[
            ("Lidl", &[(1, 200), (2, 100)]),
            ("Billa", &[(1, 150), (2, 150)]),
        ]);
        let stores = vec![store(1, "Lidl"), store(2, "Billa"), store(3, "Lidl")];
        let ranking = rank(&milk_and_bread(), &stores, &prices).unwrap();

        assert_eq!(count_class(&ranking, PriceClass::Cheapest), 3);
        assert_eq!(count_class(&ranking, PriceClass::MostExpensive), 0);
    }

    #[test]
    fn test_ties_keep_store_order_and_share_class() {
        let prices = prices(&[
            ("Lidl", &[(1, 220), (2, 150)]),
            ("Kaufland", &[(1, 215), (2, 140)]),
            ("Billa", &[(1, 240), (2, 180)]),
        ]);
        let stores = vec![
            store(1, "Lidl"),
            store(2, "Kaufland"),
            store(3, "Billa"),
            store(4, "Kaufland"),
        ];
        let ranking = rank(&milk_and_bread(), &stores, &prices).unwrap();
        let ids: Vec<u64> = ranking.iter().map(|e| e.store().id.get()).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);

        let classes: Vec<PriceClass> = ranking.iter().map(|e| e.class).collect();
        assert_eq!(
            classes,
            vec![
                PriceClass::Cheapest,
                PriceClass::Cheapest,
                PriceClass::Average,
                PriceClass::MostExpensive
            ]
        );
        assert_eq!(ranking.entries()[3].rank, 4);
    }

    #[test]
    fn test_every_store_classified_once() {
        let prices = prices(&[
            ("Lidl", &[(1, 220), (2, 150)]),
            ("Kaufland", &[(1, 215), (2, 140)]),
            ("Billa", &[(1, 240), (2, 180)]),
        ]);
        let stores = vec![store(1, "Lidl"), store(2, "Kaufland"), store(3, "Billa")];
        let ranking = rank(&milk_and_bread(), &stores, &prices).unwrap();

        let cheapest = count_class(&ranking, PriceClass::Cheapest);
        let expensive = count_class(&ranking, PriceClass::MostExpensive);
        let average = count_class(&ranking, PriceClass::Average);
        assert!(cheapest >= 1 && expensive >= 1);
        assert_eq!(cheapest + expensive + average, stores.len());
    }

    #[test]
    fn test_no_stores_gives_empty_ranking() {
        let prices = prices(&[("Lidl", &[(1, 220)])]);
        let ranking = rank(&milk_and_bread(), &[], &prices).unwrap();
        assert!(ranking.is_empty());
        assert!(ranking.cheapest().is_none());
    }
}
