//! Data access layer for cartscout's external services.
//!
//! This crate provides:
//! - `FetchClient` - HTTP fetch with per-dependency timeout/retry and logging
//! - `DependencyTag` - The services cartscout talks to
//! - `TimeoutConfig` - Per-dependency timeouts
//! - `RetryPolicy` - Retry strategies
//! - `OverpassLocator` - Supermarkets from the Overpass API
//! - `OsrmRoutePlanner` - Driving routes from an OSRM server

mod client;
mod dependency;
mod osrm;
mod overpass;
mod retry;
mod timeout;

pub use client::*;
pub use dependency::*;
pub use osrm::*;
pub use overpass::*;
pub use retry::*;
pub use timeout::*;
