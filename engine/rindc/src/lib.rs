//! Command-line driver for the Ruby indentation engine.
//!
//! The binary (`rind`) parses arguments by hand and dispatches to the
//! handlers in [`commands`]. Handlers return `Result<_, CliError>`; the
//! binary prints the error and exits with status 1.

pub mod commands;
mod error;
mod options;

use std::sync::Once;

pub use error::CliError;
pub use options::CommandOptions;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=rind_indent=debug` or `RUST_LOG=rind_lexer_core=trace`.
/// Set `RIND_LOG_TREE=1` for indented, per-span output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var("RIND_LOG_TREE").is_ok_and(|v| v == "1") {
            tracing_subscriber::registry()
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
