//! `emscope config` - show resolved paths.

use anyhow::Result;
use clap::Args;
use emscope_protocol::paths;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Show resolved paths in JSON format
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let home = paths::emscope_home();
    let cache_db = paths::default_cache_db_path();
    let endpoints = paths::default_endpoints_path();
    let targets = paths::default_targets_config_path();
    let metrics = paths::default_metrics_config_path();
    let logs = paths::default_logs_dir();

    if args.json {
        let config = serde_json::json!({
            "home": home.to_string_lossy(),
            "cache_db": {
                "path": cache_db.to_string_lossy(),
                "exists": cache_db.exists(),
            },
            "endpoints": {
                "path": endpoints.to_string_lossy(),
                "exists": endpoints.exists(),
            },
            "targets": {
                "path": targets.to_string_lossy(),
                "exists": targets.exists(),
            },
            "metrics": {
                "path": metrics.to_string_lossy(),
                "exists": metrics.exists(),
            },
            "logs": logs.to_string_lossy(),
        });
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("EMSCOPE CONFIGURATION");
    println!("=====================");
    println!();
    println!("Home:      {}", home.display());
    println!();
    println!(
        "Cache DB:  {} ({})",
        cache_db.display(),
        if cache_db.exists() { "exists" } else { "not found" }
    );
    println!(
        "Endpoints: {} ({})",
        endpoints.display(),
        if endpoints.exists() { "exists" } else { "not found" }
    );
    println!(
        "Targets:   {} ({})",
        targets.display(),
        if targets.exists() { "exists" } else { "not found" }
    );
    println!(
        "Metrics:   {} ({})",
        metrics.display(),
        if metrics.exists() { "exists" } else { "not found" }
    );
    println!();
    println!("Logs:      {}", logs.display());

    Ok(())
}
