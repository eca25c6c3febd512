//! Shared support for the volvelle command-line clients.
//!
//! - [`config`]: session defaults read from a TOML file
//! - [`render`]: plain-text worksheet and trace output
//! - [`verify`]: parsing and checking complete strings
//! - [`init_logging`]: stderr logging filtered by `RUST_LOG`

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod render;
pub mod verify;

use tracing_subscriber::EnvFilter;

/// Installs a compact stderr subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `warn`. Calling this
/// twice is harmless; the second subscriber is ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .try_init();
}
