//! Split-purchase advice: is buying at two stores worth it?

use crate::cart::Cart;
use crate::catalog::PriceTable;
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use crate::ranking::store_totals;
use crate::stores::Store;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Savings must exceed this many stotinki (2.00 BGN) before a split is proposed.
pub const SPLIT_THRESHOLD_CENTS: i64 = 200;

/// Item names the placeholder strategy always suggests for the second store.
pub const PLACEHOLDER_ITEMS: [&str; 2] = ["Milk", "Eggs"];

/// How a proposed split picks its stores and items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitStrategy {
    /// Fixed assignment: the second store in locator order gets
    /// [`PLACEHOLDER_ITEMS`], the first store gets the rest. The savings figure
    /// is the theoretical per-item floor, not the savings of that assignment.
    #[default]
    Placeholder,
    /// Each item goes to the store that prices it cheapest; the proposal moves
    /// the most valuable group away from the best single store.
    PerItemCheapest,
}

impl SplitStrategy {
    /// Parse a config value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "placeholder" => Some(SplitStrategy::Placeholder),
            "per-item-cheapest" | "per_item_cheapest" => Some(SplitStrategy::PerItemCheapest),
            _ => None,
        }
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitStrategy::Placeholder => write!(f, "placeholder"),
            SplitStrategy::PerItemCheapest => write!(f, "per-item-cheapest"),
        }
    }
}

/// The numbers behind a split decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitAnalysis {
    /// Cheapest full-cart total at a single store.
    pub best_single_store_total: Money,
    /// Sum of each item's lowest unit price across stores, times quantity.
    pub absolute_cheapest_total: Money,
    /// best_single_store_total - absolute_cheapest_total, never negative.
    pub potential_savings: Money,
}

/// A suggestion to buy some items at `store_a` and the rest at `store_b`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SplitProposal {
    /// Expected savings.
    pub savings: Money,
    /// Store for `items_for_store_a`.
    pub store_a: Store,
    /// Store for everything else.
    pub store_b: Store,
    /// Item names to buy at `store_a`.
    pub items_for_store_a: Vec<String>,
}

impl SplitProposal {
    /// User-facing tip text.
    pub fn tip(&self) -> String {
        format!(
            "You could save {} ({}) if you buy {} at {} and the rest at {}.",
            self.savings.display(),
            self.savings.convert(Currency::EUR).display(),
            self.items_for_store_a.join(", "),
            self.store_a.name,
            self.store_b.name
        )
    }
}

/// Result of one advisor pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SplitAdvice {
    /// Present whenever the advisor ran (cart of 2+ entries and at least one store).
    pub analysis: Option<SplitAnalysis>,
    /// Present only when a split is suggested.
    pub proposal: Option<SplitProposal>,
}

impl SplitAdvice {
    /// No split suggested, nothing analysed.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check whether a split is suggested.
    pub fn should_split(&self) -> bool {
        self.proposal.is_some()
    }
}

/// Decide whether splitting the purchase across two stores is worthwhile.
///
/// Unpriced items contribute zero both to store totals and to the per-item
/// floor, so `potential_savings` can never be negative.
pub fn advise(
    cart: &Cart,
    stores: &[Store],
    prices: &PriceTable,
    strategy: SplitStrategy,
) -> Result<SplitAdvice, CommerceError> {
    if cart.len() < 2 || stores.is_empty() {
        return Ok(SplitAdvice::none());
    }

    let totals = store_totals(cart, stores, prices)?;
    let best_index = first_min_index(totals.iter().map(|t| t.total.amount_cents)).unwrap_or(0);
    let best_single_store_total = totals[best_index].total;

    let mut absolute_cheapest_total = Money::zero(prices.currency());
    for entry in cart.entries() {
        let cheapest = stores
            .iter()
            .map(|s| contribution(prices, s, entry.product.id))
            .min_by_key(|m| m.amount_cents)
            .unwrap_or_else(|| Money::zero(prices.currency()));
        let line = cheapest
            .try_multiply(entry.quantity)
            .ok_or(CommerceError::Overflow)?;
        absolute_cheapest_total = absolute_cheapest_total
            .try_add(&line)
            .ok_or(CommerceError::Overflow)?;
    }

    let potential_savings = best_single_store_total
        .try_subtract(&absolute_cheapest_total)
        .ok_or(CommerceError::Overflow)?;

    let analysis = SplitAnalysis {
        best_single_store_total,
        absolute_cheapest_total,
        potential_savings,
    };

    let proposal = if potential_savings.amount_cents > SPLIT_THRESHOLD_CENTS {
        match strategy {
            SplitStrategy::Placeholder => placeholder_proposal(stores, potential_savings),
            SplitStrategy::PerItemCheapest => {
                per_item_proposal(cart, stores, prices, best_index)?
            }
        }
    } else {
        None
    };

    Ok(SplitAdvice {
        analysis: Some(analysis),
        proposal,
    })
}

fn placeholder_proposal(stores: &[Store], savings: Money) -> Option<SplitProposal> {
    if stores.len() < 2 {
        return None;
    }
    Some(SplitProposal {
        savings,
        store_a: stores[1].clone(),
        store_b: stores[0].clone(),
        items_for_store_a: PLACEHOLDER_ITEMS.iter().map(|s| s.to_string()).collect(),
    })
}

fn per_item_proposal(
    cart: &Cart,
    stores: &[Store],
    prices: &PriceTable,
    best_index: usize,
) -> Result<Option<SplitProposal>, CommerceError> {
    let best = &stores[best_index];

    // Per store: accumulated gain and the item names moved there.
    let mut groups: Vec<(i64, Vec<String>)> = vec![(0, Vec::new()); stores.len()];

    for entry in cart.entries() {
        let at_best = contribution(prices, best, entry.product.id);
        let cheapest = first_min_index(stores.iter().map(|s| {
            prices
                .unit_price(&s.chain, entry.product.id)
                .map(|p| p.amount_cents)
                .unwrap_or(i64::MAX)
        }));

        let Some(index) = cheapest else { continue };
        let Some(price) = prices.unit_price(&stores[index].chain, entry.product.id) else {
            continue;
        };
        if price.amount_cents >= at_best.amount_cents {
            continue;
        }

        let gain = (at_best.amount_cents - price.amount_cents)
            .checked_mul(entry.quantity)
            .ok_or(CommerceError::Overflow)?;
        let group = &mut groups[index];
        group.0 = group.0.checked_add(gain).ok_or(CommerceError::Overflow)?;
        group.1.push(entry.product.name.clone());
    }

    let Some(store_a) = first_max_index(groups.iter().map(|(gain, _)| *gain)) else {
        return Ok(None);
    };
    let (gain, items) = &groups[store_a];
    if *gain <= SPLIT_THRESHOLD_CENTS {
        return Ok(None);
    }

    Ok(Some(SplitProposal {
        savings: Money::new(*gain, prices.currency()),
        store_a: stores[store_a].clone(),
        store_b: best.clone(),
        items_for_store_a: items.clone(),
    }))
}

/// What an item adds to a store's total: its unit price, or zero when unpriced.
fn contribution(prices: &PriceTable, store: &Store, product: crate::ids::ProductId) -> Money {
    prices
        .unit_price(&store.chain, product)
        .unwrap_or_else(|| Money::zero(prices.currency()))
}

/// Index of the first minimum value.
fn first_min_index(values: impl Iterator<Item = i64>) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (i, v) in values.enumerate() {
        if best.map_or(true, |(_, b)| v < b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the first maximum value.
fn first_max_index(values: impl Iterator<Item = i64>) -> Option<usize> {
    first_min_index(values.map(|v| -v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Product};
    use crate::ids::{ProductId, StoreId};
    use crate::stores::GeoPoint;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Product::new(1, "Milk"),
            Product::new(2, "Chicken"),
            Product::new(3, "Rice"),
        ])
        .unwrap()
    }

    fn table(rows: &[(&str, &[(u64, i64)])]) -> PriceTable {
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

    fn store(id: u64, chain: &str) -> Store {
        Store {
            id: StoreId::new(id),
            name: format!("{} #{}", chain, id),
            chain: chain.into(),
            location: GeoPoint::new(43.2, 27.9),
        }
    }

    fn cart(items: &[(&str, i64)]) -> Cart {
        let catalog = catalog();
        let mut cart = Cart::new();
        for (name, qty) in items {
            cart.add(&catalog, name, *qty).unwrap();
        }
        cart
    }

    fn split_prices() -> PriceTable {
        table(&[
            ("Lidl", &[(1, 200), (2, 1500)]),
            ("Kaufland", &[(1, 500), (2, 1000)]),
        ])
    }

    #[test]
    fn test_single_item_cart_never_splits() {
        let advice = advise(
            &cart(&[("Milk", 5)]),
            &[store(1, "Lidl"), store(2, "Kaufland")],
            &split_prices(),
            SplitStrategy::Placeholder,
        )
        .unwrap();
        assert_eq!(advice, SplitAdvice::none());
    }

    #[test]
    fn test_analysis_numbers() {
        let advice = advise(
            &cart(&[("Milk", 1), ("Chicken", 1)]),
            &[store(1, "Lidl"), store(2, "Kaufland")],
            &split_prices(),
            SplitStrategy::Placeholder,
        )
        .unwrap();
        let analysis = advice.analysis.unwrap();
        assert_eq!(analysis.best_single_store_total.amount_cents, 1500);
        assert_eq!(analysis.absolute_cheapest_total.amount_cents, 1200);
        assert_eq!(analysis.potential_savings.amount_cents, 300);
    }

    #[test]
    fn test_placeholder_proposal() {
        let advice = advise(
            &cart(&[("Milk", 1), ("Chicken", 1)]),
            &[store(1, "Lidl"), store(2, "Kaufland")],
            &split_prices(),
            SplitStrategy::Placeholder,
        )
        .unwrap();
        assert!(advice.should_split());
        let proposal = advice.proposal.unwrap();
        assert_eq!(proposal.store_a.id, StoreId::new(2));
        assert_eq!(proposal.store_b.id, StoreId::new(1));
        assert_eq!(proposal.items_for_store_a, vec!["Milk", "Eggs"]);
        assert_eq!(proposal.savings.amount_cents, 300);
        assert_eq!(
            proposal.tip(),
            "You could save 3.00 BGN (\u{20ac}1.53) if you buy Milk, Eggs at Kaufland #2 and the rest at Lidl #1."
        );
    }

    #[test]
    fn test_per_item_cheapest_proposal() {
        let advice = advise(
            &cart(&[("Milk", 1), ("Chicken", 1)]),
            &[store(1, "Lidl"), store(2, "Kaufland")],
            &split_prices(),
            SplitStrategy::PerItemCheapest,
        )
        .unwrap();
        let proposal = advice.proposal.unwrap();
        assert_eq!(proposal.store_a.id, StoreId::new(1));
        assert_eq!(proposal.store_b.id, StoreId::new(2));
        assert_eq!(proposal.items_for_store_a, vec!["Milk"]);
        assert_eq!(proposal.savings.amount_cents, 300);
    }

    #[test]
    fn test_small_savings_do_not_split() {
        let prices = table(&[
            ("Lidl", &[(1, 220), (2, 1050)]),
            ("Kaufland", &[(1, 215), (2, 1020)]),
        ]);
        let advice = advise(
            &cart(&[("Milk", 1), ("Chicken", 1)]),
            &[store(1, "Lidl"), store(2, "Kaufland")],
            &prices,
            SplitStrategy::Placeholder,
        )
        .unwrap();
        assert!(!advice.should_split());
        assert_eq!(advice.analysis.unwrap().potential_savings.amount_cents, 0);
    }

    #[test]
    fn test_savings_never_negative_with_missing_prices() {
        let prices = table(&[
            ("Lidl", &[(2, 150)]),
            ("Kaufland", &[(1, 200), (2, 140), (3, 270)]),
        ]);
        let advice = advise(
            &cart(&[("Milk", 2), ("Chicken", 1), ("Rice", 3)]),
            &[store(1, "Lidl"), store(2, "Kaufland")],
            &prices,
            SplitStrategy::PerItemCheapest,
        )
        .unwrap();
        let analysis = advice.analysis.unwrap();
        assert!(analysis.potential_savings.amount_cents >= 0);
    }

    #[test]
    fn test_placeholder_needs_two_stores() {
        assert_eq!(placeholder_proposal(&[store(1, "Lidl")], Money::new(500, Currency::BGN)), None);
    }

    #[test]
    fn test_first_min_index_prefers_earliest() {
        assert_eq!(first_min_index([3, 1, 1, 2].into_iter()), Some(1));
        assert_eq!(first_max_index([3, 5, 5].into_iter()), Some(1));
        assert_eq!(first_min_index(std::iter::empty()), None);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(SplitStrategy::parse("placeholder"), Some(SplitStrategy::Placeholder));
        assert_eq!(
            SplitStrategy::parse("per-item-cheapest"),
            Some(SplitStrategy::PerItemCheapest)
        );
        assert_eq!(SplitStrategy::parse("tsp"), None);
    }
}
