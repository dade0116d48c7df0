//! Server startup
//!
//! [`serve`] runs the router on a bound listener until a shutdown future
//! resolves. [`start_server`] binds, spawns [`serve`] on a background task
//! and hands back a [`ServerHandle`] to stop it.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::routes::{SharedProvider, create_router};

/// Handle to a running webhook server
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    server_task: JoinHandle<io::Result<()>>,
}

impl ServerHandle {
    /// Address the server is actually bound to (useful with port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections, finish in-flight requests and wait for
    /// the server task to exit
    pub async fn shutdown(self) -> io::Result<()> {
        if self.shutdown_tx.send(true).is_err() {
            debug!("Server task already stopped");
        }
        self.server_task.await.map_err(io::Error::other)?
    }
}

/// Serve the webhook API on `listener` until `shutdown` resolves
///
/// In-flight requests are allowed to finish before this returns.
pub async fn serve<F>(listener: TcpListener, provider: SharedProvider, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    info!(
        "Starting webhook provider on {} (store: {})",
        local_addr,
        provider.store_description()
    );

    let app = create_router(provider);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Webhook provider on {} stopped", local_addr);
    Ok(())
}

/// Start serving the webhook API for `provider` on `addr`
pub async fn start_server(addr: SocketAddr, provider: SharedProvider) -> io::Result<ServerHandle> {
    // Port 0 is allowed; report what the OS picked
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let shutdown = async move {
        loop {
            if *shutdown_rx.borrow() {
                break;
            }
            if shutdown_rx.changed().await.is_err() {
                break;
            }
        }
    };
    let server_task = tokio::spawn(serve(listener, provider, shutdown));

    Ok(ServerHandle {
        local_addr,
        shutdown_tx,
        server_task,
    })
}
