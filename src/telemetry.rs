//! Tracing setup for hosts embedding the streamgraph view.
//!
//! The crate only emits `tracing` events (filter replacement, series rebuilds,
//! reconciliation levels, formatting fallbacks). Hosts that already own a
//! subscriber should ignore this module.

/// Default directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER_DIRECTIVE: &str = "streamgraph_rs=info";

/// Installs a compact `tracing` fmt subscriber when the `telemetry` feature is on.
///
/// Returns `false` without the feature, or when the host already installed a
/// global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER_DIRECTIVE));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
