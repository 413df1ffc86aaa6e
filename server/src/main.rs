use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use parley_server::config::ServerConfig;
use parley_server::db::pool::{create_pool, run_migrations};
use parley_server::engine::channel_engine::ChannelEngine;
use parley_server::engine::context::LogNotifier;
use parley_server::engine::succession::RandomPicker;
use parley_server::web::app_state::AppState;
use parley_server::web::router::build_router;

#[derive(Parser)]
#[command(name = "parley-server", about = "Membership-gated group messaging server")]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "parley.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ServerConfig::load(&args.config);
    let auth_config = config.to_auth_config();

    // Initialize database
    let pool = create_pool(&config.database.url).await?;
    run_migrations(&pool).await?;

    // The engine is stateless across requests; the pool is the only
    // shared resource.
    let engine = Arc::new(ChannelEngine::new(pool.clone(), Arc::new(RandomPicker)));

    let app_state = Arc::new(AppState {
        engine,
        db: pool,
        auth_config,
        notifier: Arc::new(LogNotifier),
    });

    let app = build_router(app_state);

    info!("Parley server starting — listening on {}", config.server.web_address);

    let listener = tokio::net::TcpListener::bind(&config.server.web_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
