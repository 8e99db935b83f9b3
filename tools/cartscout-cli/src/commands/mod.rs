//! CLI command implementations.

pub mod catalog;
pub mod compare;
pub mod config;
pub mod shop;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use cartscout_commerce::cart::{parse_quantity, CartEntry};
use cartscout_commerce::session::{Comparison, RoutePlan, ShoppingSession};
use cartscout_commerce::stores::GeoPoint;
use cartscout_data::FetchClient;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::context::Context;
use crate::output::{format_distance, price_badge, Output};

/// Arguments for the compare command.
#[derive(Args)]
pub struct CompareArgs {
    /// Items as `name` or `name:quantity`, e.g. `milk:2 bread`.
    #[arg(required = true)]
    pub items: Vec<String>,

    /// Origin as "lat, lng" (default: from config).
    #[arg(long)]
    pub origin: Option<String>,

    /// Skip driving routes.
    #[arg(long)]
    pub no_routes: bool,
}

/// Arguments for the shop command.
#[derive(Args)]
pub struct ShopArgs {
    /// Origin as "lat, lng" (default: from config).
    #[arg(long)]
    pub origin: Option<String>,

    /// Skip driving routes.
    #[arg(long)]
    pub no_routes: bool,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Only show chains whose key contains this text.
    #[arg(short, long)]
    pub chain: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Split `name[:qty]` into the product query and a quantity.
///
/// The quantity goes through [`parse_quantity`], so `milk:abc` is one milk.
pub fn parse_item(item: &str) -> (&str, i64) {
    match item.rsplit_once(':') {
        Some((name, qty)) if !name.trim().is_empty() => (name.trim(), parse_quantity(qty)),
        _ => (item.trim(), 1),
    }
}

/// The `--origin` override, or the configured origin.
pub fn resolve_origin(arg: Option<&str>, ctx: &Context) -> Result<GeoPoint> {
    match arg {
        Some(raw) => GeoPoint::parse(raw)
            .ok_or_else(|| anyhow!("Invalid origin '{}', expected \"lat, lng\"", raw)),
        None => Ok(ctx.config.origin()),
    }
}

/// Plan routes for the session's comparison, when a planner is available.
pub async fn plan_routes(
    session: &mut ShoppingSession,
    client: &Arc<FetchClient>,
    no_routes: bool,
    ctx: &Context,
) {
    if no_routes {
        return;
    }
    let Some(planner) = ctx.route_planner(client) else {
        return;
    };

    let spinner = ctx.output.spinner("Planning routes...");
    let planned = session.plan_routes(&planner).await;
    spinner.finish_and_clear();

    if let Some(plan) = session.route_plan().filter(|_| planned) {
        let failed = plan.distances.iter().filter(|d| !d.status.is_known()).count();
        if failed > 0 {
            ctx.logger
                .component("session")
                .warn_builder("some routes unavailable")
                .field_i64("failed", failed as i64)
                .field_i64("stores", plan.distances.len() as i64)
                .emit();
        }
    }
}

/// Machine-readable view of a session.
#[derive(Serialize)]
pub struct SessionReport<'a> {
    pub origin: GeoPoint,
    pub fallback_stores: bool,
    pub item_count: i64,
    pub cart: &'a [CartEntry],
    pub comparison: Option<&'a Comparison>,
    pub should_split: bool,
    pub recommendation: Option<String>,
    pub tip: Option<String>,
    pub routes: Option<&'a RoutePlan>,
}

impl<'a> SessionReport<'a> {
    pub fn new(session: &'a ShoppingSession) -> Self {
        let comparison = session.comparison();
        Self {
            origin: session.origin(),
            fallback_stores: session.store_source().is_fallback(),
            item_count: session.cart().item_count(),
            cart: session.cart().entries(),
            comparison,
            should_split: comparison.is_some_and(|c| c.split.should_split()),
            recommendation: comparison.map(|c| c.recommendation()),
            tip: comparison.and_then(|c| c.tip()),
            routes: session.route_plan(),
        }
    }
}

/// Print the cart, the ranked stores and the advice.
pub fn render_session(session: &ShoppingSession, output: &Output) {
    if output.is_json() {
        output.json(&SessionReport::new(session));
        return;
    }

    if session.cart().is_empty() {
        output.info("Your cart is empty.");
        return;
    }

    output.header(&format!("Cart ({} items)", session.cart().item_count()));
    for entry in session.cart().entries() {
        output.list_item(&format!("{} x{}", entry.product.name, entry.quantity));
    }

    let Some(comparison) = session.comparison() else {
        return;
    };

    output.header("Stores");
    if comparison.ranking.is_empty() {
        output.warn(&comparison.recommendation());
        return;
    }

    let widths = [3, 28, 10, 22, 22, 22, 10];
    output.table_row(
        &["#", "Store", "Chain", "Total", "Availability", "Distance", "Price"],
        &widths,
    );

    let origin = session.origin();
    let plan = session.route_plan();
    for entry in comparison.ranking.iter() {
        let store = entry.store();
        let rank = entry.rank.to_string();
        let price = entry.total.display_price();
        let availability = entry.total.availability();
        let distance = format_distance(
            plan.and_then(|p| p.distance_to(store.id)),
            entry.straight_line_km(&origin),
        );
        let badge = price_badge(entry.class);
        output.table_row(
            &[
                rank.as_str(),
                store.name.as_str(),
                store.chain.as_str(),
                price.as_str(),
                availability.as_str(),
                distance.as_str(),
                badge.as_str(),
            ],
            &widths,
        );
    }

    println!();
    output.highlight(&comparison.recommendation());
    if let Some(tip) = comparison.tip() {
        output.info(&tip);
    }

    if let Some(secondary) = plan.and_then(|p| p.secondary.as_ref()) {
        output.kv(
            "Second stop",
            &format!("{} ({})", secondary.store.name, secondary.distance),
        );
    }

    if session.store_source().is_fallback() {
        output.debug("Using fallback stores");
    }
}
