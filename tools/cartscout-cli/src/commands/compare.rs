//! One-shot price comparison.

use anyhow::{Context as _, Result};

use super::{parse_item, plan_routes, render_session, resolve_origin, CompareArgs};
use crate::context::Context;

/// Run the compare command.
pub async fn run(args: CompareArgs, ctx: &Context) -> Result<()> {
    let origin = resolve_origin(args.origin.as_deref(), ctx)?;
    let client = ctx.fetch_client()?;
    let mut session = ctx.start_session(&client, origin).await?;

    ctx.output.debug(&format!(
        "{} stores around {}",
        session.stores().len(),
        origin
    ));

    for item in &args.items {
        let (query, quantity) = parse_item(item);
        session
            .add(query, quantity)
            .with_context(|| format!("Cannot add '{}'", item))?;
    }

    plan_routes(&mut session, &client, args.no_routes, ctx).await;
    render_session(&session, &ctx.output);

    Ok(())
}
