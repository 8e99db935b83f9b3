//! End-to-end session tests against in-memory locator and planner fakes.

use async_trait::async_trait;
use cartscout_commerce::prelude::*;
use cartscout_commerce::stores::FallbackReason;

const ORIGIN: GeoPoint = GeoPoint::new(43.2141, 27.9147);
const LIDL_AT: GeoPoint = GeoPoint::new(43.2150, 27.9160);
const KAUFLAND_AT: GeoPoint = GeoPoint::new(43.2100, 27.9100);

struct FakeLocator(Result<Vec<StoreCandidate>, LookupError>);

#[async_trait]
impl StoreLocator for FakeLocator {
    async fn locate(
        &self,
        _origin: GeoPoint,
        _radius_m: u32,
    ) -> Result<Vec<StoreCandidate>, LookupError> {
        self.0.clone()
    }
}

/// Straight-line routes, except to `unreachable`.
struct FakePlanner {
    unreachable: Option<GeoPoint>,
}

#[async_trait]
impl RoutePlanner for FakePlanner {
    async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<Route, LookupError> {
        if self.unreachable == Some(to) {
            return Err(LookupError::NotFound("no route".into()));
        }
        Ok(Route {
            distance_m: from.distance_m(&to),
            geometry: Some(vec![from, to]),
        })
    }
}

fn two_stores() -> FakeLocator {
    FakeLocator(Ok(vec![
        StoreCandidate {
            id: StoreId::new(1),
            name: Some("Lidl Levski".into()),
            location: LIDL_AT,
        },
        StoreCandidate {
            id: StoreId::new(2),
            name: Some("Kaufland Varna".into()),
            location: KAUFLAND_AT,
        },
    ]))
}

async fn session_with(locator: &FakeLocator) -> ShoppingSession {
    let (catalog, prices) = CatalogData::builtin().into_parts().unwrap();
    let resolution = resolve_stores(locator, ORIGIN, 5000, &prices, &FallbackChain::RoundRobin)
        .await
        .unwrap();
    ShoppingSession::new(catalog, prices, ORIGIN, resolution)
}

#[tokio::test]
async fn test_milk_and_bread_ranks_kaufland_first() {
    let mut session = session_with(&two_stores()).await;
    assert_eq!(session.store_source(), &StoreSource::Located);

    session.add("Milk", 1).unwrap();
    session.add("Bread", 1).unwrap();

    let comparison = session.comparison().unwrap();
    let ranked: Vec<_> = comparison.ranking.iter().collect();
    assert_eq!(ranked[0].store().name, "Kaufland Varna");
    assert_eq!(ranked[0].total.total.amount_cents, 355);
    assert_eq!(ranked[0].class, PriceClass::Cheapest);
    assert_eq!(ranked[0].total.display_price(), "3.55 BGN / \u{20ac}1.82");
    assert_eq!(ranked[1].store().name, "Lidl Levski");
    assert_eq!(ranked[1].total.total.amount_cents, 370);
    assert_eq!(ranked[1].class, PriceClass::MostExpensive);

    assert!(!comparison.split.should_split());
    assert!(comparison.tip().is_none());
    assert_eq!(
        comparison.recommendation(),
        "Recommended Route: Go to Kaufland Varna for the lowest total cart price."
    );
}

#[tokio::test]
async fn test_removing_only_entry_clears_everything() {
    let mut session = session_with(&two_stores()).await;
    session.add("Eggs", 2).unwrap();
    let planner = FakePlanner { unreachable: None };
    assert!(session.plan_routes(&planner).await);
    assert!(session.route_plan().is_some());

    let eggs = session.entry("Eggs").unwrap().product_id();
    assert_eq!(session.remove(eggs).unwrap(), CartChange::Cleared);
    assert!(session.cart().is_empty());
    assert!(session.comparison().is_none());
    assert!(session.route_plan().is_none());
}

#[tokio::test]
async fn test_route_failure_is_isolated_to_one_store() {
    let mut session = session_with(&two_stores()).await;
    session.add("Milk", 1).unwrap();
    session.add("Bread", 1).unwrap();

    let planner = FakePlanner {
        unreachable: Some(LIDL_AT),
    };
    assert!(session.plan_routes(&planner).await);

    let plan = session.route_plan().unwrap();
    assert_eq!(plan.distances.len(), 2);

    let kaufland = plan.distance_to(StoreId::new(2)).unwrap();
    assert!(kaufland.is_known());
    let lidl = plan.distance_to(StoreId::new(1)).unwrap();
    assert_eq!(lidl.to_string(), "distance unavailable");

    let primary = plan.primary.as_ref().unwrap();
    assert_eq!(primary.store.id, StoreId::new(2));
    assert_eq!(primary.geometry.as_ref().map(Vec::len), Some(2));
    assert_eq!(session.comparison().unwrap().ranking.len(), 2);
}

#[tokio::test]
async fn test_locator_failure_falls_back() {
    let locator = FakeLocator(Err(LookupError::Timeout("25s".into())));
    let mut session = session_with(&locator).await;
    assert_eq!(
        session.store_source(),
        &StoreSource::Fallback(FallbackReason::LookupFailed(LookupError::Timeout(
            "25s".into()
        )))
    );

    session.add("Rice", 1).unwrap();
    let top = session.comparison().unwrap().ranking.cheapest().unwrap();
    assert_eq!(top.store().name, "Test Store (Lidl)");
    assert_eq!(top.total.total.amount_cents, 280);
}

const SPLIT_CATALOG: &str = r#"{
    "products": [
        { "id": 1, "name": "Milk" },
        { "id": 2, "name": "Chicken" }
    ],
    "chains": [
        { "key": "Lidl", "prices": { "1": 2.00, "2": 15.00 } },
        { "key": "Kaufland", "prices": { "1": 5.00, "2": 10.00 } }
    ]
}"#;

async fn split_session(locator: &FakeLocator, strategy: SplitStrategy) -> ShoppingSession {
    let (catalog, prices) = CatalogData::from_json(SPLIT_CATALOG)
        .unwrap()
        .into_parts()
        .unwrap();
    let resolution = resolve_stores(locator, ORIGIN, 5000, &prices, &FallbackChain::RoundRobin)
        .await
        .unwrap();
    ShoppingSession::new(catalog, prices, ORIGIN, resolution).with_split_strategy(strategy)
}

#[tokio::test]
async fn test_split_proposal_routes_store_b() {
    let mut session = split_session(&two_stores(), SplitStrategy::PerItemCheapest).await;

    session.add("Milk", 1).unwrap();
    session.add("Chicken", 1).unwrap();

    let comparison = session.comparison().unwrap();
    let proposal = comparison.split.proposal.as_ref().unwrap();
    assert_eq!(proposal.store_a.name, "Lidl Levski");
    assert_eq!(proposal.store_b.name, "Kaufland Varna");
    assert_eq!(proposal.items_for_store_a, vec!["Milk"]);
    assert_eq!(
        comparison.tip().unwrap(),
        "Smart Tip: You could save 3.00 BGN (\u{20ac}1.53) if you buy Milk at Lidl Levski and the rest at Kaufland Varna."
    );

    let planner = FakePlanner { unreachable: None };
    session.plan_routes(&planner).await;
    let plan = session.route_plan().unwrap();
    assert_eq!(plan.primary.as_ref().unwrap().store.id, StoreId::new(2));
    assert_eq!(plan.secondary.as_ref().unwrap().store.id, StoreId::new(2));
}

#[tokio::test]
async fn test_default_split_routes_store_b_when_it_is_cheapest() {
    // Kaufland is located first, so it is store B and also the cheapest store.
    let locator = FakeLocator(Ok(vec![
        StoreCandidate {
            id: StoreId::new(2),
            name: Some("Kaufland Varna".into()),
            location: KAUFLAND_AT,
        },
        StoreCandidate {
            id: StoreId::new(1),
            name: Some("Lidl Levski".into()),
            location: LIDL_AT,
        },
    ]));
    let mut session = split_session(&locator, SplitStrategy::default()).await;

    session.add("Milk", 1).unwrap();
    session.add("Chicken", 1).unwrap();

    let comparison = session.comparison().unwrap();
    let proposal = comparison.split.proposal.as_ref().unwrap();
    assert_eq!(proposal.store_a.id, StoreId::new(1));
    assert_eq!(proposal.store_b.id, StoreId::new(2));
    assert_eq!(proposal.items_for_store_a, vec!["Milk", "Eggs"]);
    assert_eq!(proposal.savings.amount_cents, 300);

    let planner = FakePlanner { unreachable: None };
    assert!(session.plan_routes(&planner).await);
    let plan = session.route_plan().unwrap();
    assert_eq!(plan.primary.as_ref().unwrap().store.id, StoreId::new(2));
    let secondary = plan.secondary.as_ref().unwrap();
    assert_eq!(secondary.store.id, StoreId::new(2));
    assert!(secondary.distance.is_known());
}

#[tokio::test]
async fn test_failed_add_leaves_session_untouched() {
    let catalog = r#"{
        "products": [
            { "id": 1, "name": "Milk" },
            { "id": 2, "name": "Gold" }
        ],
        "chains": [
            { "key": "Lidl", "prices": { "1": 2.00, "2": 1e15 } }
        ]
    }"#;
    let (catalog, prices) = CatalogData::from_json(catalog)
        .unwrap()
        .into_parts()
        .unwrap();
    let resolution = StoreResolution::offline(ORIGIN, &prices).unwrap();
    let mut session = ShoppingSession::new(catalog, prices, ORIGIN, resolution);

    session.add("Milk", 1).unwrap();
    let planner = FakePlanner { unreachable: None };
    assert!(session.plan_routes(&planner).await);
    let cart_before = session.cart().clone();
    let comparison_before = session.comparison().cloned();

    assert_eq!(session.add("Gold", 9999), Err(CommerceError::Overflow));
    assert_eq!(session.cart(), &cart_before);
    assert_eq!(session.comparison().cloned(), comparison_before);
    assert!(session.route_plan().is_some());

    assert_eq!(session.add("Gold", 1).unwrap(), CartChange::Recomputed);
    let comparison_before = session.comparison().cloned();
    assert_eq!(session.set_quantity("Gold", 9999), Err(CommerceError::Overflow));
    assert_eq!(session.entry("Gold").unwrap().quantity, 1);
    assert_eq!(session.comparison().cloned(), comparison_before);

    session.clear();
    assert!(session.add("Gold", 9999).is_err());
    assert!(session.cart().is_empty());
    assert!(session.comparison().is_none());
}

#[tokio::test]
async fn test_duplicate_locator_ids_keep_first_store() {
    let locator = FakeLocator(Ok(vec![
        StoreCandidate {
            id: StoreId::new(7),
            name: Some("Kaufland Varna".into()),
            location: KAUFLAND_AT,
        },
        StoreCandidate {
            id: StoreId::new(7),
            name: Some("Lidl Levski".into()),
            location: LIDL_AT,
        },
    ]));
    let mut session = session_with(&locator).await;
    assert_eq!(session.stores().len(), 1);

    session.add("Milk", 1).unwrap();
    let planner = FakePlanner {
        unreachable: Some(LIDL_AT),
    };
    assert!(session.plan_routes(&planner).await);
    let plan = session.route_plan().unwrap();
    assert!(plan.distance_to(StoreId::new(7)).unwrap().is_known());
}
