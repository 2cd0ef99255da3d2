//! Opt-in tracing bootstrap for hosts embedding the plot engine.
//!
//! The library only emits `tracing` events (layout warnings, registry
//! traces); it never installs a subscriber on its own. Hosts either call
//! [`init_default_tracing`] once at startup or wire their own subscriber
//! and filters.

/// Installs a compact stderr subscriber honoring `RUST_LOG`, defaulting to
/// `plotframe=info` when the variable is unset.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed by the host.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("plotframe=info"));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
