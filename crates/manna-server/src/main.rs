use anyhow::Context;
use manna_integrations::IntegrationConfig;
use manna_server::{router, AppState, ServerConfig};
use manna_store::{seed_demo_data, DataStore, StoreConfig};
use std::time::Duration;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,manna_server=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let server_config = ServerConfig::from_env().context("loading server configuration")?;
    let integrations = IntegrationConfig::from_env().context("loading integration configuration")?;
    if let Err(e) = integrations.validate_for_production() {
        tracing::warn!("Integrations partially configured: {}", e);
    }

    let store_config = StoreConfig::from_env().context("loading store configuration")?;
    let store = DataStore::open(store_config).context("opening data store")?;

    if server_config.seed_demo_data {
        let summary = seed_demo_data(&store).await.context("seeding demo data")?;
        if !summary.is_empty() {
            tracing::info!(
                projects = summary.projects,
                subscription_tiers = summary.subscription_tiers,
                "Seeded empty store"
            );
        }
    }

    let addr = server_config.bind_addr();
    let state = AppState::new(store.clone(), server_config, &integrations)
        .context("building application state")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    store.close();
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C signal, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received terminate signal, starting graceful shutdown"),
    }

    // grace period for in-flight connections
    tokio::time::sleep(Duration::from_secs(1)).await;
}
