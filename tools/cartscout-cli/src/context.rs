//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use cartscout_commerce::session::ShoppingSession;
use cartscout_commerce::stores::{resolve_stores, FallbackReason, GeoPoint, StoreResolution, StoreSource};
use cartscout_data::{DependencyTag, FetchClient, OsrmRoutePlanner, OverpassLocator};
use cartscout_observability::{LogLevel, SessionId, StructuredLogger};

use crate::config::{CartscoutConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CartscoutConfig,
    /// Where the config came from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Session logger.
    pub logger: StructuredLogger,
    /// Skip every network lookup.
    pub offline: bool,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output, offline: bool) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (CartscoutConfig::load(path)?, Some(PathBuf::from(path))),
            None => match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CartscoutConfig::default(), None),
            },
        };

        let level = if output.is_verbose() {
            std::cmp::min(config.logging.level, LogLevel::Debug)
        } else {
            config.logging.level
        };
        let logger = StructuredLogger::new(SessionId::generate())
            .with_min_level(level)
            .with_format(config.logging.format);

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            logger,
            offline,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CartscoutConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CartscoutConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory relative paths in the config resolve against.
    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .as_ref()
            .and_then(|p| p.parent())
            .map(|p| self.resolve_path(&p.to_string_lossy()))
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// HTTP client configured with the locator and routing policies.
    pub fn fetch_client(&self) -> Result<Arc<FetchClient>> {
        let client = FetchClient::new(self.logger.clone())?
            .with_policy(DependencyTag::StoreLocator, self.config.locator.policy())?
            .with_policy(DependencyTag::Routing, self.config.routing.policy())?;
        Ok(Arc::new(client))
    }

    /// The route planner, unless offline or routing is disabled.
    pub fn route_planner(&self, client: &Arc<FetchClient>) -> Option<OsrmRoutePlanner> {
        if self.offline || !self.config.routing.enabled {
            return None;
        }
        Some(OsrmRoutePlanner::new(
            client.clone(),
            self.config.routing.endpoint.clone(),
        ))
    }

    /// Load the catalog, find stores around `origin` and start a session.
    pub async fn start_session(
        &self,
        client: &Arc<FetchClient>,
        origin: GeoPoint,
    ) -> Result<ShoppingSession> {
        let data = self.config.load_catalog(&self.config_dir())?;
        let (catalog, prices) = data.into_parts().context("Invalid catalog")?;

        let resolution = if self.offline {
            StoreResolution::offline(origin, &prices)?
        } else {
            let locator = OverpassLocator::new(client.clone(), self.config.locator.endpoint.clone());
            let spinner = self.output.spinner("Looking for supermarkets nearby...");
            let resolution = resolve_stores(
                &locator,
                origin,
                self.config.locator.radius_m,
                &prices,
                &self.config.fallback_chain(),
            )
            .await;
            spinner.finish_and_clear();
            resolution?
        };

        self.log_store_source(&resolution);

        Ok(
            ShoppingSession::new(catalog, prices, origin, resolution)
                .with_split_strategy(self.config.ranking.split_strategy),
        )
    }

    fn log_store_source(&self, resolution: &StoreResolution) {
        let logger = self.logger.component("session");
        match &resolution.source {
            StoreSource::Located => logger
                .info_builder("stores resolved")
                .field_i64("stores", resolution.stores.len() as i64)
                .emit(),
            StoreSource::Fallback(FallbackReason::Offline) => {
                logger.debug("offline, using fallback stores")
            }
            StoreSource::Fallback(reason) => {
                let reason = match reason {
                    FallbackReason::LookupFailed(e) => e.to_string(),
                    _ => "no supermarkets within radius".to_string(),
                };
                logger
                    .warn_builder("using fallback stores")
                    .field("reason", reason)
                    .emit();
            }
        }
    }
}
