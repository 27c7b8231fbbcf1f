use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber used by the binaries.  `RUST_LOG` overrides the
/// default filter.  Calling this more than once is harmless.
pub fn initialize_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => { filter }
        Err(_) => { EnvFilter::new(default_directive) }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
