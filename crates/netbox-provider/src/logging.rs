//! Logging setup
//!
//! Plugin hosts read the provider's stdout, so logs go to stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `netbox_client=debug`
pub const LOG_ENV: &str = "NETBOX_PROVIDER_LOG";

/// Install the global `tracing` subscriber.
///
/// The filter comes from `NETBOX_PROVIDER_LOG`, then `RUST_LOG`, then `info`.
/// Returns `false` when a subscriber was already installed.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        assert!(!init());
        tracing::info!("logging initialized");
    }
}
