//! Supermarket lookup through the Overpass API.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cartscout_commerce::stores::{GeoPoint, StoreCandidate, StoreLocator};
use cartscout_commerce::{LookupError, StoreId};
use cartscout_observability::StructuredLogger;
use serde::Deserialize;

use crate::client::FetchClient;
use crate::dependency::DependencyTag;

/// Public Overpass interpreter.
pub const DEFAULT_OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Server-side query timeout, in seconds.
const QUERY_TIMEOUT_S: u32 = 25;

/// Overpass QL for every `shop=supermarket` node, way and relation within
/// `radius_m` of `origin`, with centres for areas.
pub fn build_query(origin: GeoPoint, radius_m: u32) -> String {
    let around = format!("(around:{},{},{})", radius_m, origin.lat, origin.lng);
    format!(
        "[out:json][timeout:{timeout}];\
         (node[\"shop\"=\"supermarket\"]{around};\
         way[\"shop\"=\"supermarket\"]{around};\
         relation[\"shop\"=\"supermarket\"]{around};);\
         out center;",
        timeout = QUERY_TIMEOUT_S,
        around = around
    )
}

/// Interpreter response; only the fields cartscout reads.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// OSM element type. Ids are only unique within one type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    Node,
    Way,
    Relation,
}

impl ElementKind {
    /// Tag stored in the top two bits of a [`StoreId`]. Nodes keep their raw id.
    fn id_tag(self) -> u64 {
        match self {
            ElementKind::Node => 0,
            ElementKind::Way => 1,
            ElementKind::Relation => 2,
        }
    }
}

/// A node, way or relation.
#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type", default)]
    pub kind: ElementKind,
    pub id: u64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Centre of a way or relation.
#[derive(Debug, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassElement {
    /// Node position, or the centre of an area.
    fn location(&self) -> Option<GeoPoint> {
        match (self.lat, self.lon, &self.center) {
            (Some(lat), Some(lon), _) => Some(GeoPoint::new(lat, lon)),
            (_, _, Some(c)) => Some(GeoPoint::new(c.lat, c.lon)),
            _ => None,
        }
    }

    /// Store id unique across element types.
    fn store_id(&self) -> StoreId {
        StoreId::new((self.id & OSM_ID_MASK) | (self.kind.id_tag() << 62))
    }
}

const OSM_ID_MASK: u64 = (1 << 62) - 1;

impl OverpassResponse {
    /// Store candidates in response order. Elements without a position are skipped.
    pub fn into_candidates(self) -> Vec<StoreCandidate> {
        self.elements
            .into_iter()
            .filter_map(|el| {
                let location = el.location()?;
                Some(StoreCandidate {
                    id: el.store_id(),
                    name: el.tags.get("name").cloned(),
                    location,
                })
            })
            .collect()
    }
}

/// [`StoreLocator`] backed by an Overpass interpreter.
pub struct OverpassLocator {
    client: Arc<FetchClient>,
    endpoint: String,
    logger: StructuredLogger,
}

impl OverpassLocator {
    /// Create a locator against `endpoint`.
    pub fn new(client: Arc<FetchClient>, endpoint: impl Into<String>) -> Self {
        let logger = client.logger().component("locator");
        Self {
            client,
            endpoint: endpoint.into(),
            logger,
        }
    }
}

#[async_trait]
impl StoreLocator for OverpassLocator {
    async fn locate(
        &self,
        origin: GeoPoint,
        radius_m: u32,
    ) -> Result<Vec<StoreCandidate>, LookupError> {
        let query = build_query(origin, radius_m);
        let response: OverpassResponse = self
            .client
            .post_text_json(&self.endpoint, query, DependencyTag::StoreLocator)
            .await?;

        let candidates = response.into_candidates();
        self.logger
            .info_builder("supermarkets located")
            .field("origin", origin.to_string())
            .field_i64("radius_m", i64::from(radius_m))
            .field_i64("found", candidates.len() as i64)
            .emit();
        Ok(candidates)
    }
}
