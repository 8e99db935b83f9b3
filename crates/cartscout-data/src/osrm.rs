//! Driving routes from an OSRM server.

use std::sync::Arc;

use async_trait::async_trait;
use cartscout_commerce::routing::{Route, RoutePlanner};
use cartscout_commerce::stores::GeoPoint;
use cartscout_commerce::LookupError;
use cartscout_observability::StructuredLogger;
use serde::Deserialize;

use crate::client::FetchClient;
use crate::dependency::DependencyTag;

/// Public OSRM demo server.
pub const DEFAULT_OSRM_ENDPOINT: &str = "https://router.project-osrm.org";

/// Driving route URL. OSRM takes coordinates as `lng,lat`.
pub fn route_url(base: &str, from: GeoPoint, to: GeoPoint) -> String {
    format!(
        "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
        base.trim_end_matches('/'),
        from.lng,
        from.lat,
        to.lng,
        to.lat
    )
}

/// Route service response; only the fields cartscout reads.
#[derive(Debug, Deserialize)]
pub struct OsrmResponse {
    pub code: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

/// One route alternative.
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    /// Metres.
    pub distance: f64,
    pub geometry: Option<OsrmGeometry>,
}

/// GeoJSON line string.
#[derive(Debug, Deserialize)]
pub struct OsrmGeometry {
    /// `[lng, lat]` pairs.
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

impl OsrmResponse {
    /// The first route, or `NotFound` when the server found none.
    pub fn into_route(self) -> Result<Route, LookupError> {
        let reason = self
            .message
            .or(self.code)
            .unwrap_or_else(|| "no route".to_string());

        let first = self
            .routes
            .into_iter()
            .next()
            .ok_or(LookupError::NotFound(reason))?;

        Ok(Route {
            distance_m: first.distance,
            geometry: first.geometry.map(|g| {
                g.coordinates
                    .into_iter()
                    .map(|[lng, lat]| GeoPoint::new(lat, lng))
                    .collect()
            }),
        })
    }
}

/// [`RoutePlanner`] backed by an OSRM server.
pub struct OsrmRoutePlanner {
    client: Arc<FetchClient>,
    endpoint: String,
    logger: StructuredLogger,
}

impl OsrmRoutePlanner {
    /// Create a planner against `endpoint`.
    pub fn new(client: Arc<FetchClient>, endpoint: impl Into<String>) -> Self {
        let logger = client.logger().component("routing");
        Self {
            client,
            endpoint: endpoint.into(),
            logger,
        }
    }
}

#[async_trait]
impl RoutePlanner for OsrmRoutePlanner {
    async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<Route, LookupError> {
        let url = route_url(&self.endpoint, from, to);
        let response: OsrmResponse = self.client.get_json(&url, DependencyTag::Routing).await?;

        let route = response.into_route();
        match &route {
            Ok(r) => self
                .logger
                .debug_builder("route planned")
                .field("to", to.to_string())
                .field_f64("distance_km", r.distance_m / 1000.0)
                .emit(),
            Err(e) => self
                .logger
                .warn_builder("no route")
                .field("to", to.to_string())
                .field("error", e.to_string())
                .emit(),
        }
        route
    }
}
