//! `emscope search` - query the cached catalog.

use anyhow::Result;
use clap::Args;
use emscope_db::CatalogDb;
use emscope_protocol::paths;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Endpoint name from endpoints.yaml
    #[arg(long)]
    pub endpoint: String,

    /// Substring to match against target names
    #[arg(long, default_value = "")]
    pub query: String,

    /// Comma-separated type-name filter (e.g. rac_database,oracle_pdb)
    #[arg(long)]
    pub types: Option<String>,

    /// Maximum number of results
    #[arg(long, default_value_t = 50)]
    pub limit: i64,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: SearchArgs) -> Result<()> {
    let db = CatalogDb::open(paths::default_cache_db_path()).await?;

    let type_filters: Option<Vec<String>> = args.types.as_deref().map(|types| {
        types
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    });

    let results = db
        .search_targets(&args.endpoint, &args.query, type_filters.as_deref(), args.limit)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No cached targets matched (try `emscope refresh --endpoint {}`)", args.endpoint);
        return Ok(());
    }
    for target in &results {
        println!(
            "{:<42} {:<20} {}",
            target.name,
            target.type_name.as_str(),
            target.id
        );
    }
    Ok(())
}
