//! docserve - single-request file server
//!
//! Serves files from a document root over a minimal HTTP/1.1 subset, plus a
//! probe client that measures connection round-trip time.

pub mod client;
pub mod config;
pub mod http;
pub mod server;
pub mod static_files;
