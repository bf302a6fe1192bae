//! # HTTP Server
//!
//! JSON API over the marketplace façade, built on axum.

pub mod endpoints;
pub mod errors;
pub mod middleware;

mod router;
pub use router::*;

use std::net::SocketAddr;

use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;

/// Serves `router` on `addr` until the process receives Ctrl-C.
pub async fn serve(addr: SocketAddr, router: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("unable to listen for shutdown signal: {e}");
        // never resolve, the server keeps running
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
