//! Tracing setup for deployment binaries.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber, honoring `RUST_LOG` and defaulting to
/// `info`.
///
/// Call once from the embedding binary's `main`; the library crates only
/// ever emit events.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
