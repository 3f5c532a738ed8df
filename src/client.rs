//! Round-trip probe
//!
//! Opens one connection to a running server, times how long the connect
//! takes, asks for a single file and returns whatever the first read yields.

use std::time::Instant;

use anyhow::Context;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Server address as `ip:port`
    pub server: String,
    /// File to request, without the leading '/'
    pub file: String,
    /// Upper bound for the single receive call
    pub recv_buffer_size: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            server: "127.0.0.1:8080".to_string(),
            file: "index.html".to_string(),
            recv_buffer_size: 4096,
        }
    }
}

impl ProbeConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(server) = lookup("PROBE_SERVER") {
            cfg.server = server;
        }
        if let Some(file) = lookup("PROBE_FILE") {
            cfg.file = file;
        }
        if let Some(size) = lookup("PROBE_BUFFER") {
            cfg.recv_buffer_size = size
                .trim()
                .parse()
                .with_context(|| format!("PROBE_BUFFER has an invalid value: {size}"))?;
        }
        Ok(cfg)
    }

    /// Host part of `server`, used for the `Host` header.
    pub fn host(&self) -> &str {
        self.server
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or(&self.server)
    }
}

#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// First chunk of the response, decoded lossily
    pub response: String,
    /// Time taken to establish the TCP connection, in milliseconds
    pub rtt_ms: f64,
}

pub fn build_request(file: &str, host: &str) -> String {
    format!("GET /{file} HTTP/1.1\r\nHost: {host}\r\n\r\n")
}

pub async fn probe(cfg: &ProbeConfig) -> anyhow::Result<ProbeReport> {
    let started = Instant::now();
    let mut stream = TcpStream::connect(&cfg.server)
        .await
        .with_context(|| format!("failed to connect to {}", cfg.server))?;
    let rtt_ms = started.elapsed().as_secs_f64() * 1000.0;
    tracing::debug!(server = %cfg.server, rtt_ms, "Connected");

    let request = build_request(&cfg.file, cfg.host());
    stream
        .write_all(request.as_bytes())
        .await
        .context("failed to send request")?;

    let mut buf = vec![0u8; cfg.recv_buffer_size];
    let n = stream
        .read(&mut buf)
        .await
        .context("failed to read response")?;

    Ok(ProbeReport {
        response: String::from_utf8_lossy(&buf[..n]).into_owned(),
        rtt_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_matches_server_expectations() {
        assert_eq!(
            build_request("index.html", "127.0.0.1"),
            "GET /index.html HTTP/1.1\r\nHost: 127.0.0.1\r\n\r\n"
        );
    }

    #[test]
    fn host_strips_port() {
        let cfg = ProbeConfig::default();
        assert_eq!(cfg.host(), "127.0.0.1");
    }
}
