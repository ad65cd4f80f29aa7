//! Logging setup for the binary

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set
///
/// `--verbose` raises anything quieter than debug to debug.
#[must_use]
pub fn filter_directive(log_level: &str, verbose: bool) -> String {
    let level = log_level.trim().to_ascii_lowercase();
    if verbose && matches!(level.as_str(), "off" | "error" | "warn" | "info") {
        "debug".to_string()
    } else {
        level
    }
}

/// Install the global fmt subscriber writing to stderr
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init_logging(log_level: &str, verbose: bool) -> Result<()> {
    let directive = filter_directive(log_level, verbose);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}
