//! Strata - group, paginate and cross-link content collections.

mod cli;
mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::fs;
use std::path::Path;
use strata::{Config, Engine, Item};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Check => {
            log!("check"; "`{}` is valid: {} group(s), permalink group `{}`",
                cli.config.display(),
                config.groups.len(),
                config.permalink_group);
            Ok(())
        }
        Commands::Build {
            items,
            output,
            pretty,
        } => build(config, items, output.as_deref(), *pretty),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::from_path(&cli.config)?;
    config.validate()?;
    Ok(config)
}

fn build(config: Config, items: &Path, output: Option<&Path>, pretty: bool) -> Result<()> {
    let raw = fs::read_to_string(items)
        .with_context(|| format!("reading items from `{}`", items.display()))?;
    let collection: Vec<Item> =
        serde_json::from_str(&raw).context("items file must be a JSON array of items")?;
    let total = collection.len();

    let engine = Engine::new(config);
    let result = engine.run(collection)?;
    log!("build"; "classified {} item(s) into {} page(s)", total, result.pages.len());

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("writing page map to `{}`", path.display()))?;
            log!("build"; "page map written to `{}`", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
