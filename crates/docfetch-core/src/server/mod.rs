//! HTTP endpoint: `GET /api/download?url=<encoded document url>`.
//!
//! Serves the resolved document as an attachment with
//! `cache-control: private, no-store`; every failure is a JSON
//! `{ "error": "..." }` body with status 400 or 500.

mod handler;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::resolver::Resolver;

pub use handler::{document_response, error_response, ErrorBody};

pub const DOWNLOAD_PATH: &str = "/api/download";

pub fn router(resolver: Arc<Resolver>) -> Router {
    Router::new()
        .route(DOWNLOAD_PATH, get(handler::download_handler))
        .route("/health", get(handler::health_handler))
        .with_state(resolver)
}

/// Binds `bind_address` and serves until Ctrl+C / SIGTERM.
pub async fn serve(bind_address: &str, resolver: Resolver) -> Result<()> {
    let listener = TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("bind {}", bind_address))?;
    serve_on(listener, resolver, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` completes.
pub async fn serve_on<F>(listener: TcpListener, resolver: Resolver, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr().context("listener address")?;
    info!(host_suffix = %resolver.host_suffix(), "serving documents on {}", address);

    axum::serve(listener, router(Arc::new(resolver)))
        .with_graceful_shutdown(shutdown)
        .await
        .context("http server")?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
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
