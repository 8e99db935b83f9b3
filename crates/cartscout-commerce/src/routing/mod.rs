//! Route planning against an external planner.

mod planner;

pub use planner::{
    resolve_distances, resolve_routes, DistanceStatus, Route, RoutePlanner, StoreDistance,
    StoreRoute,
};
