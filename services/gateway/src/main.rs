use catalog_gateway::config::GatewayConfig;
use catalog_gateway::router::create_router;
use catalog_gateway::state::AppState;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing, RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting catalog gateway");

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        upstream = %config.upstream_base_url,
        vendors = config.vendors.len(),
        lookup = ?config.lookup_mode,
        "configuration loaded"
    );

    let state = AppState::from_config(&config);
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(config.listen_addr).await?;

    tracing::info!("Listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
