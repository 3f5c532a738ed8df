use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::info;

use crate::config::{Config, ServerConfig};
use crate::http::connection::{Connection, ConnectionSettings};
use crate::static_files::Resolver;

/// Pause after a failed accept. EMFILE and ENFILE keep failing immediately
/// until a handler releases its descriptor, so an instant retry would spin.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// A bound socket plus the settings handed to every connection it accepts.
pub struct Listener {
    inner: TcpListener,
    settings: ConnectionSettings,
}

impl Listener {
    /// Binds `host:port` with the configured backlog. Any failure here is fatal.
    pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<Self> {
        let listen_addr = cfg.listen_addr();
        let resolved: Vec<SocketAddr> = tokio::net::lookup_host(&listen_addr)
            .await
            .with_context(|| format!("cannot resolve {listen_addr}"))?
            .collect();
        let addr = pick_bind_addr(&resolved)
            .with_context(|| format!("{listen_addr} resolved to no address"))?;

        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .context("failed to create socket")?;
        socket.set_reuseaddr(true)?;
        socket
            .bind(addr)
            .with_context(|| format!("failed to bind {addr}"))?;
        let inner = socket
            .listen(cfg.backlog)
            .with_context(|| format!("failed to listen on {addr}"))?;

        info!("Listening on {} (backlog {})", inner.local_addr()?, cfg.backlog);

        Ok(Self {
            inner,
            settings: ConnectionSettings::from(cfg),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Accepts forever, one spawned task per connection.
    pub async fn serve(self, resolver: Arc<Resolver>) -> anyhow::Result<()> {
        let inner = &self.inner;
        loop {
            let (socket, peer) =
                accept_with_backoff(move || inner.accept(), ACCEPT_RETRY_DELAY).await;
            info!("Accepted connection from {}", peer);

            let conn = Connection::new(socket, peer, resolver.clone(), self.settings);
            tokio::spawn(async move {
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {:#}", peer, e);
                }
            });
        }
    }
}

/// IPv4 first; an IPv6 address is used only when the host has no IPv4 one.
fn pick_bind_addr(resolved: &[SocketAddr]) -> Option<SocketAddr> {
    resolved
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| resolved.first())
        .copied()
}

async fn accept_with_backoff<F, Fut, T>(mut accept: F, delay: Duration) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<T>>,
{
    loop {
        match accept().await {
            Ok(accepted) => return accepted,
            Err(e) => {
                tracing::warn!("Accept failed: {}", e);
                tokio::time::sleep(delay).await;
            }
        }
    }
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = Listener::bind(&cfg.server).await?;
    info!("Serving files from {}", cfg.static_files.root.display());

    let resolver = Arc::new(Resolver::new(cfg.static_files.root.clone()));
    listener.serve(resolver).await
}
