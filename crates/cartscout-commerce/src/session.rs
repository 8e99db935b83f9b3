//! A shopping session: the cart plus everything derived from it.
//!
//! Every cart mutation recomputes the comparison (ranking and split advice).
//! An empty cart clears both the comparison and any planned routes.
//!
//! Route planning is asynchronous and works from a snapshot: take a
//! [`RouteRequest`], run it, then [`ShoppingSession::apply_route_plan`]. Nothing
//! cancels or discards a plan whose request was taken before a later cart
//! change, so a slow planner can install routes for an older ranking. Callers
//! that interleave mutations with planning see that race.

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartEntry};
use crate::catalog::{Catalog, PriceTable};
use crate::error::{CommerceError, LookupError};
use crate::ids::{ProductId, StoreId};
use crate::ranking::{rank, Ranking, NO_STORES_MESSAGE};
use crate::routing::{resolve_routes, DistanceStatus, RoutePlanner, StoreDistance};
use crate::split::{advise, SplitAdvice, SplitStrategy};
use crate::stores::{GeoPoint, Store, StoreResolution, StoreSource};

/// What a cart mutation did to the derived state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// The cart is non-empty and the comparison was recomputed.
    Recomputed,
    /// The cart is empty; comparison and routes were cleared.
    Cleared,
    /// Nothing changed.
    Unchanged,
}

/// Ranking and split advice for the current cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    /// Stores ranked by cart total.
    pub ranking: Ranking,
    /// Split-purchase advice.
    pub split: SplitAdvice,
}

impl Comparison {
    /// Headline for the comparison.
    pub fn recommendation(&self) -> String {
        match self.ranking.cheapest() {
            Some(top) => format!(
                "Recommended Route: Go to {} for the lowest total cart price.",
                top.store().name
            ),
            None => NO_STORES_MESSAGE.to_string(),
        }
    }

    /// Split tip, when a split is proposed.
    pub fn tip(&self) -> Option<String> {
        self.split
            .proposal
            .as_ref()
            .map(|p| format!("Smart Tip: {}", p.tip()))
    }
}

/// A route drawn to one store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannedRoute {
    /// Destination.
    pub store: Store,
    /// Distance outcome.
    pub distance: DistanceStatus,
    /// Path, when the planner returned one.
    pub geometry: Option<Vec<GeoPoint>>,
}

/// Routes for a comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutePlan {
    /// Road distance to every ranked store, in ranking order.
    pub distances: Vec<StoreDistance>,
    /// Route to the top-ranked store.
    pub primary: Option<PlannedRoute>,
    /// Route to store B of a split proposal.
    pub secondary: Option<PlannedRoute>,
}

impl RoutePlan {
    /// Distance to a store, if it was part of the plan.
    pub fn distance_to(&self, store: StoreId) -> Option<&DistanceStatus> {
        self.distances
            .iter()
            .find(|d| d.store_id == store)
            .map(|d| &d.status)
    }
}

/// Snapshot of what needs routing, detached from the session.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    origin: GeoPoint,
    stores: Vec<Store>,
    secondary: Option<StoreId>,
}

impl RouteRequest {
    /// Stores that will be routed, in ranking order.
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    /// Request every route concurrently and wait for all of them.
    pub async fn execute(self, planner: &dyn RoutePlanner) -> RoutePlan {
        let routes = resolve_routes(planner, self.origin, &self.stores).await;

        let mut distances = Vec::with_capacity(routes.len());
        let mut primary = None;
        let mut secondary = None;

        for (index, (store, route)) in self.stores.into_iter().zip(routes).enumerate() {
            let (distance, geometry) = split_route(route.result);
            distances.push(StoreDistance {
                store_id: store.id,
                status: distance.clone(),
            });

            let wanted_secondary = self.secondary == Some(store.id);
            let planned = PlannedRoute {
                store,
                distance,
                geometry,
            };
            if wanted_secondary {
                secondary = Some(planned.clone());
            }
            if index == 0 {
                primary = Some(planned);
            }
        }

        RoutePlan {
            distances,
            primary,
            secondary,
        }
    }
}

fn split_route(
    result: Result<crate::routing::Route, LookupError>,
) -> (DistanceStatus, Option<Vec<GeoPoint>>) {
    match result {
        Ok(route) => (
            DistanceStatus::Known {
                meters: route.distance_m,
            },
            route.geometry,
        ),
        Err(e) => (
            DistanceStatus::Unavailable {
                reason: e.to_string(),
            },
            None,
        ),
    }
}

/// Cart, stores and derived comparison for one user.
#[derive(Debug, Clone)]
pub struct ShoppingSession {
    catalog: Catalog,
    prices: PriceTable,
    origin: GeoPoint,
    stores: Vec<Store>,
    source: StoreSource,
    strategy: SplitStrategy,
    cart: Cart,
    comparison: Option<Comparison>,
    route_plan: Option<RoutePlan>,
}

impl ShoppingSession {
    /// Start a session with an empty cart.
    pub fn new(
        catalog: Catalog,
        prices: PriceTable,
        origin: GeoPoint,
        resolution: StoreResolution,
    ) -> Self {
        Self {
            catalog,
            prices,
            origin,
            stores: resolution.stores,
            source: resolution.source,
            strategy: SplitStrategy::default(),
            cart: Cart::new(),
            comparison: None,
            route_plan: None,
        }
    }

    /// Use a different split strategy.
    pub fn with_split_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Product catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Price table.
    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// User location.
    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Stores being compared.
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    /// Where the stores came from.
    pub fn store_source(&self) -> &StoreSource {
        &self.source
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current comparison, `None` while the cart is empty.
    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    /// Routes installed by the last [`apply_route_plan`](Self::apply_route_plan).
    pub fn route_plan(&self) -> Option<&RoutePlan> {
        self.route_plan.as_ref()
    }

    /// Add `quantity` of the product matching `query`.
    ///
    /// On error the cart and comparison are left as they were.
    pub fn add(&mut self, query: &str, quantity: i64) -> Result<CartChange, CommerceError> {
        let mut cart = self.cart.clone();
        cart.add(&self.catalog, query, quantity)?;
        self.commit(cart)
    }

    /// Remove a product's entry. Products not in the cart are a no-op.
    pub fn remove(&mut self, product_id: ProductId) -> Result<CartChange, CommerceError> {
        let mut cart = self.cart.clone();
        if !cart.remove(product_id) {
            return Ok(CartChange::Unchanged);
        }
        self.commit(cart)
    }

    /// Set the quantity of the product matching `query`. Zero or less removes it.
    pub fn set_quantity(&mut self, query: &str, quantity: i64) -> Result<CartChange, CommerceError> {
        let product_id = self.catalog.resolve(query)?.id;
        let mut cart = self.cart.clone();
        if !cart.update_quantity(product_id, quantity)? {
            return Ok(CartChange::Unchanged);
        }
        self.commit(cart)
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> CartChange {
        self.cart.clear();
        self.comparison = None;
        self.route_plan = None;
        CartChange::Cleared
    }

    /// Entry for the product matching `query`, if it is in the cart.
    pub fn entry(&self, query: &str) -> Option<&CartEntry> {
        let product = self.catalog.resolve(query).ok()?;
        self.cart.get(product.id)
    }

    /// Install `cart` once its comparison has been computed.
    fn commit(&mut self, cart: Cart) -> Result<CartChange, CommerceError> {
        let comparison = self.compare(&cart)?;
        let change = match comparison {
            Some(_) => CartChange::Recomputed,
            None => CartChange::Cleared,
        };
        self.cart = cart;
        self.comparison = comparison;
        self.route_plan = None;
        Ok(change)
    }

    fn compare(&self, cart: &Cart) -> Result<Option<Comparison>, CommerceError> {
        if cart.is_empty() {
            return Ok(None);
        }
        let ranking = rank(cart, &self.stores, &self.prices)?;
        let split = advise(cart, &self.stores, &self.prices, self.strategy)?;
        Ok(Some(Comparison { ranking, split }))
    }

    /// Snapshot of the routes the current comparison needs.
    ///
    /// `None` while there is no comparison or nothing was ranked.
    pub fn route_request(&self) -> Option<RouteRequest> {
        let comparison = self.comparison.as_ref()?;
        if comparison.ranking.is_empty() {
            return None;
        }
        Some(RouteRequest {
            origin: self.origin,
            stores: comparison
                .ranking
                .iter()
                .map(|e| e.store().clone())
                .collect(),
            secondary: comparison
                .split
                .proposal
                .as_ref()
                .map(|p| p.store_b.id),
        })
    }

    /// Install a finished plan. Not checked against the current cart.
    pub fn apply_route_plan(&mut self, plan: RoutePlan) {
        self.route_plan = Some(plan);
    }

    /// Plan routes for the current comparison and install them.
    ///
    /// Returns `false` when there was nothing to route.
    pub async fn plan_routes(&mut self, planner: &dyn RoutePlanner) -> bool {
        let Some(request) = self.route_request() else {
            return false;
        };
        let plan = request.execute(planner).await;
        self.apply_route_plan(plan);
        true
    }
}
