//! Opt-in tracing initialization for binaries and integration tests.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is the embedding application's call. This helper wires up the standard
//! fmt layer with an env filter (`RUST_LOG`, falling back to
//! `info,flowloom=debug`).

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default subscriber. Safe to call once per process.
///
/// Returns quietly if a global subscriber is already set, so tests that
/// race on initialization do not panic.
pub fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,flowloom=debug"))
        .expect("static default filter parses");

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
