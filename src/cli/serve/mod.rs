//! Serve command - runs the HTTP admin API

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use crate::api::router::{cors_layer, create_router_with_state};
use crate::api::state::AppState;
use crate::config::AppConfig;
use crate::domain::llama_server::{rescan_models, RescanRequest};
use crate::infrastructure::logging;

/// Run the admin API server
pub async fn run() -> anyhow::Result<()> {
    let config = super::load_app_config();
    logging::init_logging(&logging::LoggingConfig::from(&config.logging));

    let state = crate::create_app_state(&config)?;

    if config.llama.autostart {
        start_llama_server(&state).await;
    }

    let mut app = create_router_with_state(state.clone());
    if config.server.cors_enabled {
        app = app.layer(cors_layer());
    }

    let addr = build_socket_addr(&config)?;
    info!("Starting admin API on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    stop_llama_server(&state).await;
    info!("Admin API shutdown complete");

    Ok(())
}

/// Boot llama-server with the configured defaults; failures are logged, not fatal
async fn start_llama_server(state: &AppState) {
    let Some(integration) = state.llama_integration.as_deref() else {
        return;
    };

    let config = RescanRequest::default().resolve(&state.rescan_defaults, |key| (state.env)(key));
    if let Err(e) = rescan_models(integration, config).await {
        error!(error = %e, "llama-server did not start; use the rescan endpoint to retry");
    }
}

async fn stop_llama_server(state: &AppState) {
    if let Some(integration) = state.llama_integration.as_deref() {
        if let Err(e) = integration.stop().await {
            warn!(error = %e, "Failed to stop llama-server");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
