//! Static file lookup
//!
//! Maps request paths onto files below a document root.

pub mod resolver;

pub use resolver::{ResourceOutcome, Resolver};
