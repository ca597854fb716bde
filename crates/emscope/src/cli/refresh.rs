//! `emscope refresh` - pull the flat catalog into the cache.

use anyhow::{Context, Result};
use clap::Args;
use emscope::storage::ConfigStore;
use emscope_client::OemClient;
use emscope_db::CatalogDb;
use emscope_protocol::paths;

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Endpoint name from endpoints.yaml
    #[arg(long)]
    pub endpoint: String,
}

pub async fn run(args: RefreshArgs) -> Result<()> {
    let store = ConfigStore::from_default_paths();
    let endpoint = store
        .endpoint_by_name(&args.endpoint)?
        .with_context(|| format!("Unknown endpoint: {}", args.endpoint))?;

    let client = OemClient::connect(&endpoint)?;
    let targets = client
        .all_targets()
        .await
        .context("Failed to fetch catalog from OEM")?;

    let db = CatalogDb::open(paths::default_cache_db_path()).await?;
    let count = db.replace_targets(&args.endpoint, &targets).await?;

    println!("Refreshed {}: {} targets cached", args.endpoint, count);
    Ok(())
}
