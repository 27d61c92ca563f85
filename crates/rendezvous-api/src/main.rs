//! Rendezvous API server entry point.

use std::error::Error;
use std::sync::Arc;

use rendezvous_api::config::ApiConfig;
use rendezvous_api::state::AppState;
use rendezvous_api::{build_router, sweeper};
use rendezvous_core::clock::SystemClock;
use rendezvous_core::token::RandomTokenGenerator;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    info!("Starting Rendezvous API server");

    // Read configuration from environment.
    let config = ApiConfig::from_env()?;
    let signaling_config = config.signaling_config();
    info!(
        session_ttl_secs = signaling_config.ttl_seconds(),
        ice_servers = signaling_config.ice_servers().len(),
        "signaling configured"
    );

    // Build application state.
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(RandomTokenGenerator),
        signaling_config,
    );

    let sweeper = config.sweep_interval.map(|period| {
        info!(period_secs = period.as_secs(), "background session sweep enabled");
        sweeper::spawn_session_sweeper(app_state.clone(), period)
    });

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutdown signal received");
}
