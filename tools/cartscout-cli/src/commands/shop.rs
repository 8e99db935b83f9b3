//! Interactive shopping list.

use anyhow::{bail, Result};
use cartscout_commerce::cart::{parse_quantity, CartEntry};
use cartscout_commerce::session::{CartChange, ShoppingSession};
use dialoguer::{Input, Select};

use super::{plan_routes, render_session, resolve_origin, ShopArgs};
use crate::context::Context;

const ACTIONS: [&str; 5] = [
    "Add item",
    "Change quantity",
    "Remove item",
    "Clear cart",
    "Quit",
];

/// Run the shop command.
pub async fn run(args: ShopArgs, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        bail!("The shop command is interactive; use `cartscout compare --json` instead.");
    }

    let origin = resolve_origin(args.origin.as_deref(), ctx)?;
    let client = ctx.fetch_client()?;
    let mut session = ctx.start_session(&client, origin).await?;

    ctx.output.info(&format!(
        "{} stores found. Build your cart; prices update after every change.",
        session.stores().len()
    ));

    loop {
        let action = Select::new()
            .with_prompt("What next?")
            .items(&ACTIONS)
            .default(0)
            .interact()?;

        let change = match action {
            0 => add_item(&mut session, ctx)?,
            1 => change_quantity(&mut session, ctx)?,
            2 => remove_item(&mut session, ctx)?,
            3 => session.clear(),
            _ => break,
        };

        match change {
            CartChange::Unchanged => continue,
            CartChange::Cleared => ctx.output.info("Your cart is empty."),
            CartChange::Recomputed => {
                plan_routes(&mut session, &client, args.no_routes, ctx).await;
                render_session(&session, &ctx.output);
            }
        }
    }

    Ok(())
}

fn add_item(session: &mut ShoppingSession, ctx: &Context) -> Result<CartChange> {
    let names: Vec<&str> = session.catalog().names().collect();
    let choice = Select::new()
        .with_prompt("Product")
        .items(&names)
        .default(0)
        .interact()?;
    let name = names[choice].to_string();

    let raw: String = Input::new()
        .with_prompt("Quantity")
        .default("1".to_string())
        .interact_text()?;

    match session.add(&name, parse_quantity(&raw)) {
        Ok(change) => Ok(change),
        Err(e) => {
            ctx.output.warn(&e.to_string());
            Ok(CartChange::Unchanged)
        }
    }
}

/// Let the user pick a cart entry; `None` when the cart is empty.
fn pick_entry(
    session: &ShoppingSession,
    prompt: &str,
    ctx: &Context,
) -> Result<Option<CartEntry>> {
    let entries = session.cart().entries();
    if entries.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(None);
    }

    let labels: Vec<String> = entries
        .iter()
        .map(|e| format!("{} x{}", e.product.name, e.quantity))
        .collect();
    let choice = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(entries.get(choice).cloned())
}

fn change_quantity(session: &mut ShoppingSession, ctx: &Context) -> Result<CartChange> {
    let Some(entry) = pick_entry(session, "Change", ctx)? else {
        return Ok(CartChange::Unchanged);
    };

    let raw: String = Input::new()
        .with_prompt("New quantity (0 removes)")
        .default(entry.quantity.to_string())
        .interact_text()?;
    let Ok(quantity) = raw.trim().parse::<i64>() else {
        ctx.output.warn(&format!("Not a quantity: {}", raw.trim()));
        return Ok(CartChange::Unchanged);
    };

    match session.set_quantity(&entry.product.name, quantity) {
        Ok(change) => Ok(change),
        Err(e) => {
            ctx.output.warn(&e.to_string());
            Ok(CartChange::Unchanged)
        }
    }
}

fn remove_item(session: &mut ShoppingSession, ctx: &Context) -> Result<CartChange> {
    let Some(entry) = pick_entry(session, "Remove", ctx)? else {
        return Ok(CartChange::Unchanged);
    };
    Ok(session.remove(entry.product_id())?)
}
