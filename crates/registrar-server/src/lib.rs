use std::sync::Arc;

use anyhow::{Context as _, Result};
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use registrar_config::AppConfig;
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub mod error;
pub mod routes;
pub mod state;
pub mod stores;

use routes::{health_handler, list_handler, submit_handler};
use state::AppState;

pub const SUBMISSIONS_PATH: &str = "/submissions";
pub const LEGACY_SUBMISSIONS_PATH: &str = "/registratedusers";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(SUBMISSIONS_PATH, get(list_handler).post(submit_handler))
        .route(LEGACY_SUBMISSIONS_PATH, get(list_handler).post(submit_handler))
        .route("/healthz", get(health_handler))
        .with_state(state)
}

pub fn app(state: Arc<AppState>, allowed_origin: &str) -> Result<Router> {
    let origin = HeaderValue::from_str(allowed_origin)
        .with_context(|| format!("invalid allowed origin {allowed_origin}"))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true);

    Ok(router(state).layer(cors))
}

pub async fn serve(state: Arc<AppState>, config: &AppConfig) -> Result<()> {
    let app = app(state, &config.allowed_origin)?;

    let address = format!("{}:{}", config.bind, config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("bind {address}"))?;
    info!("Server running on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                warn!(error = %err, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
