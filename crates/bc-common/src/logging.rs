//! Logging bootstrap.
//!
//! Text output by default, JSON when `LOG_FORMAT=json` is set.
//! Level filtering comes from `RUST_LOG` (default: info), e.g.
//! `RUST_LOG=bc_platform=debug,tower_http=info`.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Install the global tracing subscriber for a service.
///
/// Must be called once, before any logging happens. The service name
/// is recorded on the startup line so aggregated logs stay
/// attributable when several binaries share a sink.
pub fn init_logging(service_name: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json_output = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_target(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true).with_ansi(true))
            .init();
    }

    tracing::debug!(service = %service_name, "logging initialized");
}
