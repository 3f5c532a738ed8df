use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::ServerConfig;
use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::static_files::Resolver;

/// Per-connection knobs copied out of the server config.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    pub read_buffer_size: usize,
    pub read_timeout: Option<Duration>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for ConnectionSettings {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            read_buffer_size: cfg.read_buffer_size,
            read_timeout: cfg.read_timeout(),
        }
    }
}

/// One accepted connection, served exactly once and then dropped.
pub struct Connection<S = TcpStream> {
    stream: S,
    peer: SocketAddr,
    resolver: Arc<Resolver>,
    settings: ConnectionSettings,
    state: ConnectionState,
}

pub enum ConnectionState {
    Receiving,
    Parsing(Vec<u8>),
    Resolving(Request),
    Responding(Response),
    Closed(StatusCode),
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        stream: S,
        peer: SocketAddr,
        resolver: Arc<Resolver>,
        settings: ConnectionSettings,
    ) -> Self {
        Self {
            stream,
            peer,
            resolver,
            settings,
            state: ConnectionState::Receiving,
        }
    }

    /// Drives the connection to `Closed` and reports the status sent.
    ///
    /// Consumes the connection, so the stream is closed on every return path.
    pub async fn run(mut self) -> anyhow::Result<StatusCode> {
        let mut path = None;

        let status = loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Receiving);
            self.state = match state {
                ConnectionState::Receiving => {
                    let raw = self.receive().await?;
                    tracing::debug!(peer = %self.peer, bytes = raw.len(), "Received request");
                    ConnectionState::Parsing(raw)
                }

                ConnectionState::Parsing(raw) => match parse_request(&raw) {
                    Ok(req) => ConnectionState::Resolving(req),
                    Err(e) => {
                        tracing::warn!(peer = %self.peer, error = %e, "Bad request");
                        ConnectionState::Responding(Response::bad_request())
                    }
                },

                ConnectionState::Resolving(req) => {
                    let outcome = self.resolver.resolve(&req.path).await;
                    path = Some(req.path);
                    ConnectionState::Responding(Response::from_outcome(outcome))
                }

                ConnectionState::Responding(response) => {
                    let writer = ResponseWriter::new(&response);
                    writer
                        .write_to_stream(&mut self.stream)
                        .await
                        .context("failed to send response")?;
                    ConnectionState::Closed(response.status)
                }

                ConnectionState::Closed(status) => break status,
            };
        };

        tracing::info!(
            peer = %self.peer,
            path = path.as_deref().unwrap_or("-"),
            status = status.as_u16(),
            "Served request"
        );
        Ok(status)
    }

    /// A single read of at most `read_buffer_size` bytes. Zero bytes means
    /// the peer sent nothing before closing its side.
    async fn receive(&mut self) -> anyhow::Result<Vec<u8>> {
        let limit = self.settings.read_timeout;
        let mut buf = vec![0u8; self.settings.read_buffer_size];
        let read = self.stream.read(&mut buf);

        let n = match limit {
            Some(limit) => timeout(limit, read)
                .await
                .map_err(|_| anyhow::anyhow!("no request within {:?}", limit))?
                .context("failed to read request")?,
            None => read.await.context("failed to read request")?,
        };

        buf.truncate(n);
        Ok(buf)
    }
}
