use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use storefront_cli::{Cli, blob_store, catalog_path, execute, load_catalog, save_catalog};
use storefront_infra::{FromEnv, StorefrontConfig};

#[tokio::main]
async fn main() -> Result<()> {
    storefront_observability::init();

    let cli = Cli::parse();
    let config = StorefrontConfig::from_env()?;
    let path = catalog_path(&cli, &config)?;

    let repo = Arc::new(load_catalog(&path)?);
    let blobs = blob_store(&config, &path);
    let outcome = execute(&cli.command, repo.clone(), &blobs, &config).await?;

    if outcome.catalog_changed {
        save_catalog(&repo, &path).await?;
    }
    println!("{}", serde_json::to_string_pretty(&outcome.output)?);
    Ok(())
}
