//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[origin]");
    ctx.output.kv("lat", &config.origin.lat.to_string());
    ctx.output.kv("lng", &config.origin.lng.to_string());

    ctx.output.info("[locator]");
    ctx.output.kv("endpoint", &config.locator.endpoint);
    ctx.output.kv("radius_m", &config.locator.radius_m.to_string());
    ctx.output.kv("timeout_ms", &config.locator.timeout_ms.to_string());
    ctx.output.kv("max_retries", &config.locator.max_retries.to_string());

    ctx.output.info("[routing]");
    ctx.output.kv("enabled", &config.routing.enabled.to_string());
    ctx.output.kv("endpoint", &config.routing.endpoint);
    ctx.output.kv("timeout_ms", &config.routing.timeout_ms.to_string());
    ctx.output.kv("max_retries", &config.routing.max_retries.to_string());

    ctx.output.info("[ranking]");
    ctx.output.kv("split_strategy", &config.ranking.split_strategy.to_string());
    ctx.output.kv("fallback_chain", &config.ranking.fallback_chain);

    ctx.output.info("[catalog]");
    ctx.output.kv(
        "file",
        config.catalog.file.as_deref().unwrap_or("(built-in)"),
    );

    ctx.output.info("[logging]");
    ctx.output.kv("level", &config.logging.level.to_string());
    ctx.output.kv("format", &config.logging.format.to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("cartscout.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
