//! Dependency tagging for the external services.

use std::time::Duration;

/// The external services cartscout calls.
///
/// Each tag carries a default timeout and retry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTag {
    /// Supermarket search (Overpass).
    StoreLocator,
    /// Driving routes (OSRM).
    Routing,
}

impl DependencyTag {
    /// Every dependency, in a fixed order.
    pub const ALL: [DependencyTag; 2] = [Self::StoreLocator, Self::Routing];

    /// Get the default timeout for this dependency type.
    pub fn default_timeout(&self) -> Duration {
        match self {
            // Overpass is asked to finish within 25s server-side.
            Self::StoreLocator => Duration::from_secs(30),
            Self::Routing => Duration::from_secs(10),
        }
    }

    /// Get the default max retries for this dependency type.
    pub fn default_max_retries(&self) -> u32 {
        match self {
            Self::StoreLocator => 1,
            Self::Routing => 2,
        }
    }

    /// Get the name of this dependency.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StoreLocator => "store_locator",
            Self::Routing => "routing",
        }
    }
}

impl std::fmt::Display for DependencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
