//! HTTP protocol implementation.
//!
//! A deliberately small slice of HTTP/1.1: one GET per connection, answered
//! with one of three fixed response shapes, then the connection is closed.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine
//! - **`parser`**: Extracts method and path from the first request line
//! - **`request`**: The parsed request
//! - **`response`**: Status codes and the response builder
//! - **`writer`**: Frames a response into wire bytes and sends it
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │  Receiving  │ ← One read, up to the buffer size
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Parsing   │──── invalid ────┐
//!        └──────┬──────┘                 │
//!               │ GET <path>             │
//!               ▼                        │
//!        ┌─────────────┐                 │
//!        │  Resolving  │ ← Read file     │
//!        └──────┬──────┘                 │
//!               ▼                        │
//!        ┌─────────────┐                 │
//!        │ Responding  │ ◄───── 400 ─────┘
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Closed    │
//!        └─────────────┘
//! ```
//!
//! A transport error in any state ends the run early. The stream is owned by
//! the connection, so it is closed either way.
//!
//! # Example
//!
//! ```ignore
//! use docserve::http::connection::{Connection, ConnectionSettings};
//! use docserve::static_files::Resolver;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let resolver = Arc::new(Resolver::new("."));
//!
//!     loop {
//!         let (socket, peer) = listener.accept().await?;
//!         let conn = Connection::new(socket, peer, resolver.clone(), ConnectionSettings::default());
//!         tokio::spawn(async move {
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
