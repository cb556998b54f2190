// Route Bridge - Main Server
// Run with: cargo run --bin server

//! # Route Bridge Server Binary
//!
//! Starts the outer host on the configured address. The inner backend is not
//! built here: the first request that needs it (anything bridged under `/api`,
//! or the `/gssp` page) triggers construction.
//!
//! Once running:
//! - `GET /` renders the fetch-based page
//! - `GET /gssp` renders the server-side page
//! - `GET /api/randomNumber` answers directly from the outer host
//! - `GET /api/randomNumber/:param`, `/api/graphql` go through the backend

use clap::Parser;
use dotenv::dotenv;
use route_bridge::BridgeServerBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "server", about = "Route Bridge HTTP server")]
struct Args {
    /// Address to bind
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "SERVER_PORT", default_value_t = 3000)]
    port: u16,

    /// Enable permissive CORS
    #[arg(long, env = "CORS_ENABLED", default_value_t = true, action = clap::ArgAction::Set)]
    cors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    if let Err(e) = dotenv() {
        eprintln!("Warning: Could not load .env file: {}", e);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    info!("🚀 Starting Route Bridge Server...");
    info!("Server: {}:{}", args.host, args.port);

    BridgeServerBuilder::new()
        .with_host(args.host)
        .with_port(args.port)
        .with_cors(args.cors)
        .build()?
        .run()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}
