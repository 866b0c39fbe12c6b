//! ruler server: HTTP front end for alert rule groups.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use ruler_core::Config;
use ruler_rules::store::{load_seed_file, MemoryStore};
use ruler_server::{build_router, AppState};

// ── CLI ─────────────────────────────────────────────────────────────

/// Serve rule group documents over HTTP.
#[derive(Parser, Debug)]
#[command(name = "ruler-server", version, about)]
struct Cli {
    /// YAML file with namespaces and rules loaded at startup
    /// (overrides RULER_SEED_FILE).
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Bind host (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
}

fn build_store(seed: Option<&PathBuf>) -> anyhow::Result<MemoryStore> {
    let Some(path) = seed else {
        info!("No seed file configured, starting with an empty store");
        return Ok(MemoryStore::new());
    };

    let seed = load_seed_file(path)
        .with_context(|| format!("failed to load seed file {}", path.display()))?;
    MemoryStore::from_seed(seed).with_context(|| format!("invalid seed file {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ruler_core::config::load_dotenv();
    let mut config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.seed.is_some() {
        config.store.seed_file = cli.seed;
    }
    config.log_summary();

    let store = Arc::new(build_store(config.store.seed_file.as_ref())?);
    let state = Arc::new(AppState::with_memory_store(store));
    let app = build_router(state, &config.server.cors_origin);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
