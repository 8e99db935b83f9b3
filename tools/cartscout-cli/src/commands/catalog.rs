//! Product and price listing.

use anyhow::{Context as _, Result};

use super::CatalogArgs;
use crate::context::Context;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let data = ctx.config.load_catalog(&ctx.config_dir())?;

    if ctx.output.is_json() {
        ctx.output.json(&data);
        return Ok(());
    }

    let (catalog, prices) = data.into_parts().context("Invalid catalog")?;

    let filter = args.chain.as_deref().map(str::to_lowercase);
    let chains: Vec<_> = prices
        .chains()
        .iter()
        .filter(|c| match &filter {
            Some(f) => c.chain.as_str().to_lowercase().contains(f),
            None => true,
        })
        .collect();

    ctx.output.header(&format!("Catalog ({})", prices.currency()));
    if chains.is_empty() {
        ctx.output.info("No matching chains.");
        return Ok(());
    }

    let mut header = vec!["Product"];
    header.extend(chains.iter().map(|c| c.chain.as_str()));
    let mut widths = vec![24];
    widths.extend(chains.iter().map(|_| 10));
    ctx.output.table_row(&header, &widths);

    for product in catalog.products() {
        let cells: Vec<String> = chains
            .iter()
            .map(|c| match c.price(product.id) {
                Some(price) => price.display_amount(),
                None => "-".to_string(),
            })
            .collect();
        let mut row = vec![product.name.as_str()];
        row.extend(cells.iter().map(String::as_str));
        ctx.output.table_row(&row, &widths);
    }

    Ok(())
}
