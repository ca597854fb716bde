//! `emscope auto-map` - discover and tag a cluster's topology.

use anyhow::{bail, Context, Result};
use clap::Args;
use emscope::storage::ConfigStore;
use emscope_client::OemClient;
use emscope_db::CatalogDb;
use emscope_mapping::auto_map_system;
use emscope_protocol::{paths, TargetType};

#[derive(Debug, Args)]
pub struct AutoMapArgs {
    /// Endpoint name from endpoints.yaml
    #[arg(long)]
    pub endpoint: String,

    /// Root target name (e.g. ap1 or ap1_AP1PDB1)
    #[arg(long)]
    pub root_name: String,

    /// Root target type (e.g. rac_database or oracle_pdb)
    #[arg(long)]
    pub root_type: String,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: AutoMapArgs) -> Result<()> {
    let store = ConfigStore::from_default_paths();
    let endpoint = store
        .endpoint_by_name(&args.endpoint)?
        .with_context(|| format!("Unknown endpoint: {}", args.endpoint))?;

    let db = CatalogDb::open(paths::default_cache_db_path()).await?;
    let catalog = db.all_targets(&args.endpoint).await?;

    let root_type = TargetType::from(args.root_type.as_str());
    let root_exists = catalog
        .iter()
        .any(|t| t.name == args.root_name && t.type_name == root_type);
    if !root_exists {
        bail!(
            "Root target {} ({}) not in cached catalog; refresh the endpoint first",
            args.root_name,
            args.root_type
        );
    }

    let client = OemClient::connect(&endpoint)?;
    let targets = auto_map_system(&catalog, &args.root_name, &root_type, &client).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&targets)?);
        return Ok(());
    }

    for target in &targets {
        let tags: Vec<String> = target
            .tags
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        println!(
            "{:<42} {:<20} {}",
            target.name,
            target.type_name.as_str(),
            tags.join(" ")
        );
    }
    println!("{} targets mapped", targets.len());
    Ok(())
}
