//! Tracing subscriber initialisation.
//!
//! The core library only emits events; the binary decides where they go.
//! User-facing progress is printed by the prompts; by default only warnings
//! (network fallbacks) and errors are logged.
//!
//! | Flag(s) | Filter level |
//! |---------|--------------|
//! | (none)  | WARN         |
//! | `-v`    | INFO         |
//! | `-vv`   | DEBUG        |
//! | `-vvv`  | TRACE        |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber, writing to stderr
pub fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let level = derive_level(verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("scaffolder_core={level},create_unify={level}"))
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// Translate the verbosity counter to a level string
fn derive_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
