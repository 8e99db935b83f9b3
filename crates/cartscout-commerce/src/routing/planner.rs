//! Route planner contract and concurrent distance lookups.

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LookupError;
use crate::ids::StoreId;
use crate::stores::{GeoPoint, Store};

/// Finds a driving route between two points.
#[async_trait]
pub trait RoutePlanner: Send + Sync {
    /// Route from `from` to `to`.
    async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<Route, LookupError>;
}

/// A driving route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Road distance in metres.
    pub distance_m: f64,
    /// Path from origin to destination, when the planner returns one.
    pub geometry: Option<Vec<GeoPoint>>,
}

impl Route {
    /// Road distance in kilometres.
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }
}

/// Outcome of a distance lookup for one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DistanceStatus {
    /// The planner found a route.
    Known { meters: f64 },
    /// The lookup failed; other stores are unaffected.
    Unavailable { reason: String },
}

impl DistanceStatus {
    /// Metres, when known.
    pub fn meters(&self) -> Option<f64> {
        match self {
            DistanceStatus::Known { meters } => Some(*meters),
            DistanceStatus::Unavailable { .. } => None,
        }
    }

    /// Check whether a distance is known.
    pub fn is_known(&self) -> bool {
        matches!(self, DistanceStatus::Known { .. })
    }
}

impl fmt::Display for DistanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceStatus::Known { meters } => write!(f, "{:.2} km", meters / 1000.0),
            DistanceStatus::Unavailable { .. } => write!(f, "distance unavailable"),
        }
    }
}

impl From<Result<Route, LookupError>> for DistanceStatus {
    fn from(result: Result<Route, LookupError>) -> Self {
        match result {
            Ok(route) => DistanceStatus::Known {
                meters: route.distance_m,
            },
            Err(e) => DistanceStatus::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

/// Road distance to one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDistance {
    /// The store.
    pub store_id: StoreId,
    /// Lookup outcome.
    #[serde(flatten)]
    pub status: DistanceStatus,
}

/// Route to one store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRoute {
    /// The store.
    pub store_id: StoreId,
    /// Planner outcome.
    pub result: Result<Route, LookupError>,
}

/// Request a route to every store at once and wait for all of them.
///
/// Results come back in store order. One failed request does not affect the
/// others.
pub async fn resolve_routes(
    planner: &dyn RoutePlanner,
    origin: GeoPoint,
    stores: &[Store],
) -> Vec<StoreRoute> {
    let lookups = stores.iter().map(|store| {
        let store_id = store.id;
        let destination = store.location;
        async move {
            StoreRoute {
                store_id,
                result: planner.route(origin, destination).await,
            }
        }
    });
    join_all(lookups).await
}

/// Road distance to every store, looked up concurrently.
///
/// A failed lookup becomes [`DistanceStatus::Unavailable`] for that store only.
pub async fn resolve_distances(
    planner: &dyn RoutePlanner,
    origin: GeoPoint,
    stores: &[Store],
) -> Vec<StoreDistance> {
    resolve_routes(planner, origin, stores)
        .await
        .into_iter()
        .map(|r| StoreDistance {
            store_id: r.store_id,
            status: r.result.into(),
        })
        .collect()
}
