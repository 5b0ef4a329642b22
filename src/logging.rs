//! Log setup for the binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Variable holding a `tracing` filter directive, e.g. `notecmd=debug`.
pub const ENV_LOG: &str = "NOTECMD_LOG";

/// Filter used when `NOTECMD_LOG` is unset or invalid.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn filter(directive: Option<&str>, verbose: bool) -> EnvFilter {
    directive.and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Logs go to stderr so they never mix with
/// command output. Safe to call more than once.
pub fn init(verbose: bool) {
    let directive = std::env::var(ENV_LOG).ok();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter(directive.as_deref(), verbose))
        .try_init();
}
