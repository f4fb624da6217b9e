//! Tracing setup for the `stitchpat` binary.
//!
//! Events are written to stderr; stdout carries command output and `--json`
//! documents only.

use std::io::IsTerminal;

use tracing::{Level, span};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter directives applied when `RUST_LOG` is unset or unparsable.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "stitchpat=debug,info"
    } else {
        "stitchpat=info,warn"
    }
}

fn colorize_stderr() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

/// Install the global subscriber.
///
/// Verbose mode also prints event targets and a line per closed span, which
/// shows how long each subcommand took.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))?;

    let span_events = if verbose {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(colorize_stderr())
        .with_target(verbose)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(span_events);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;
    Ok(())
}

/// Span wrapping one CLI subcommand.
pub fn command_span(command: &str) -> tracing::Span {
    span!(Level::INFO, "command", command = %command)
}
