//! Tracing subscriber setup.
//!
//! Production (`APP_ENV=production`) emits JSON lines for log aggregation;
//! anything else gets colored human-readable output. `RUST_LOG` overrides
//! the default level in both cases.

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn is_production(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

/// Server logging on stdout, `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if is_production(&get_environment()) {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stdout),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .init();
    }
}

/// CLI logging on stderr so stdout carries only the dashboard.
/// Quieter by default: provider fallbacks show up at `warn`.
pub fn init_cli_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
