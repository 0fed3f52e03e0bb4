//! # Structured Logging
//!
//! `tracing` subscriber setup for the binary. Output goes to stderr so that
//! stdout carries nothing but mnemonics and recovered secrets, and can be
//! piped or redirected on its own.

use std::io;

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Target of every event the binary itself emits.
///
/// The binary is also named `slip39`, so without an explicit target its
/// events would share the library's prefix and could not be filtered apart.
pub const LOG_TARGET: &str = "slip39_cli";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Install the global subscriber. Call once, before any command runs.
///
/// `RUST_LOG` takes precedence over `default_filter`, e.g.
///
/// ```text
/// RUST_LOG=slip39=debug,slip39_cli=info
/// ```
///
/// `slip39_cli` is the more specific directive, so it wins over `slip39` for
/// the binary's own events.
pub fn init_logging(default_filter: &str, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let output = match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .without_time()
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_current_span(false)
            .boxed(),
    };

    tracing_subscriber::registry().with(filter).with(output).init();
    tracing::debug!(target: LOG_TARGET, ?format, "logging initialized");
}
