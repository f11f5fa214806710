mod api;
mod middleware;

use std::sync::Arc;

use storefinder_core::configured_brands;
use storefinder_mapbox::MapboxClient;
use storefinder_search::{sink_for_config, EnvSecretProvider, SearchSettings, StoreSearch};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, rate_limit_state, AppState, RadiusPolicy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storefinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let brands = configured_brands(&config)?;
    let client = MapboxClient::from_app_config(&config)?;
    let search = StoreSearch::new(
        client.clone(),
        client,
        Arc::new(EnvSecretProvider::default()),
        brands,
    )
    .with_settings(SearchSettings::from_app_config(&config))
    .with_audit_sink(sink_for_config(&config));

    if std::env::var(storefinder_search::MAPBOX_TOKEN_VAR).is_err() {
        tracing::warn!(
            "{} is not set; searches will fail until it is provided",
            storefinder_search::MAPBOX_TOKEN_VAR
        );
    }

    let state = AppState::new(search, RadiusPolicy::from_app_config(&config));
    let app = build_app(state, rate_limit_state(config.rate_limit_per_minute));

    tracing::info!(
        bind_addr = %config.bind_addr,
        env = %config.env,
        places_endpoint = %config.places_endpoint,
        "storefinder server listening"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
