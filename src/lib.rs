pub mod api;
pub mod assessment; // Simulated status assessment + health metrics
pub mod automation;
pub mod config;
pub mod dashboard;
pub mod export; // Paginated PDF export
pub mod models;
pub mod prescription;
pub mod templates;

use tracing_subscriber::EnvFilter;

/// Starts logging, the tokio runtime and the API server, then serves until
/// Ctrl-C.
pub fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = config::AppConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Cannot start runtime: {e}"))?;

    runtime.block_on(async move {
        let ctx = api::ApiContext::new(config);
        let server = api::start_server(ctx).await?;
        tracing::info!(addr = %server.session.server_addr, "Listening");

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for shutdown signal: {e}");
        }
        server.stop().await;
        Ok(())
    })
}
