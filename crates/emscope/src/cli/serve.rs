//! `emscope serve` - run the HTTP API.

use anyhow::Result;
use clap::Args;
use emscope::server::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8421")]
    pub bind: SocketAddr,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let state = Arc::new(AppState::initialize().await?);
    server::serve(state, args.bind).await
}
