//! Server bootstrap and lifecycle.

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;

use crate::common::config::AppConfig;
use crate::server::{routes, state::AppState};

/// Start the relay API and return `(bound_port, handle)`. The listener
/// binds synchronously so a startup failure surfaces here, not after the
/// process reports itself healthy.
pub async fn start_server(config: &AppConfig) -> Result<(u16, axum_server::Handle)> {
    let state = AppState::new(config);
    let app = routes::create_router(&state, config.max_upload_bytes);
    start_api_listener(app, config.port).await
}

async fn start_api_listener(app: Router, port: u16) -> Result<(u16, axum_server::Handle)> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = std::net::TcpListener::bind(addr).with_context(|| {
        format!("failed to bind API port {port} - is another peerlink instance running?")
    })?;
    listener
        .set_nonblocking(true)
        .context("failed to set listener to non-blocking mode")?;
    let port = listener.local_addr()?.port();

    let handle = axum_server::Handle::new();
    let server_handle = handle.clone();
    tokio::spawn(async move {
        if let Err(err) = axum_server::from_tcp(listener)
            .handle(server_handle)
            .serve(app.into_make_service())
            .await
        {
            tracing::error!("server error: {err}");
        }
    });

    Ok((port, handle))
}

/// Block until Ctrl-C, then drain the HTTP listener. Detached transfer
/// tasks are not waited on; an unserved offer dies with the process.
pub async fn wait_for_shutdown(handle: axum_server::Handle) {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("shutting down the server");
    handle.graceful_shutdown(Some(Duration::from_secs(5)));
}
