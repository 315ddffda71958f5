//! HTTP Server
//!
//! Runs the router until the shutdown signal fires, then closes the store.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::warn;

use crate::store::KvStore;

/// Serves `router` on `listener` until `shutdown` resolves.
///
/// The store is closed whether the server stopped cleanly or failed; the serve
/// error, if any, is returned afterwards.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    store: Arc<dyn KvStore>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await;

    if let Err(e) = &result {
        warn!("Server error: {}", e);
    }

    store.close().await;
    result
}
