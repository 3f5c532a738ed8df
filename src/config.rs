//! Startup configuration.
//!
//! Values come from three layers, later ones winning:
//! built-in defaults, an optional YAML file named by `DOCSERVE_CONFIG`,
//! and individual environment variables.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

/// Listener and per-connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g. "127.0.0.1")
    pub host: String,
    pub port: u16,
    /// Pending-connection queue depth passed to `listen(2)`
    pub backlog: u32,
    /// Upper bound for the single receive call on each connection
    pub read_buffer_size: usize,
    /// Deadline for the receive call. `None` waits forever.
    pub read_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory that request paths are resolved against
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            backlog: 5,
            read_buffer_size: 1024,
            read_timeout_ms: None,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration using `lookup` in place of the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup("DOCSERVE_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(listen) = lookup("LISTEN") {
            let addr: SocketAddr = listen
                .parse()
                .with_context(|| format!("LISTEN is not a socket address: {listen}"))?;
            cfg.server.host = addr.ip().to_string();
            cfg.server.port = addr.port();
        }
        if let Some(host) = lookup("DOCSERVE_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = lookup("DOCSERVE_PORT") {
            cfg.server.port = parse_var("DOCSERVE_PORT", &port)?;
        }
        if let Some(backlog) = lookup("DOCSERVE_BACKLOG") {
            cfg.server.backlog = parse_var("DOCSERVE_BACKLOG", &backlog)?;
        }
        if let Some(size) = lookup("DOCSERVE_BUFFER") {
            cfg.server.read_buffer_size = parse_var("DOCSERVE_BUFFER", &size)?;
        }
        if let Some(ms) = lookup("DOCSERVE_READ_TIMEOUT_MS") {
            cfg.server.read_timeout_ms = Some(parse_var("DOCSERVE_READ_TIMEOUT_MS", &ms)?);
        }
        if let Some(root) = lookup("DOCSERVE_ROOT") {
            cfg.static_files.root = PathBuf::from(root);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.backlog == 0 {
            bail!("backlog must be at least 1");
        }
        if self.server.read_buffer_size == 0 {
            bail!("read_buffer_size must be at least 1");
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{name} has an invalid value: {value}"))
}
