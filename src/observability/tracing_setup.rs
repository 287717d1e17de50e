// observability/tracing_setup.rs - Tracing Configuration

use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Tracing output format
#[derive(Clone, Debug, Default)]
pub enum TracingFormat {
    /// Human-readable format (default)
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
    /// JSON format for log aggregation
    Json,
}

/// Configuration for tracing
#[derive(Clone, Debug)]
pub struct TracingConfig {
    /// Log level filter (e.g., "info", "debug", "spawn_sdk=debug")
    pub filter: String,

    /// Output format
    pub format: TracingFormat,

    /// Include target (module path)
    pub with_target: bool,

    /// ANSI colors (for terminal output)
    pub with_ansi: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: "info,spawn_sdk=debug".into(),
            format: TracingFormat::Pretty,
            with_target: true,
            with_ansi: true,
        }
    }
}

impl TracingConfig {
    /// Create a production config (JSON, minimal overhead)
    pub fn production() -> Self {
        Self {
            filter: "info".into(),
            format: TracingFormat::Json,
            with_target: true,
            with_ansi: false,
        }
    }
}

/// Initialize the tracing subscriber
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over the configured filter when set.
pub fn init_tracing(config: TracingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    match config.format {
        TracingFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_target(config.with_target)
                .with_ansi(config.with_ansi);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
        }
        TracingFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_target(config.with_target)
                .with_ansi(config.with_ansi);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
        }
        TracingFormat::Json => {
            let fmt_layer = fmt::layer().json().with_target(config.with_target);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
        }
    }

    tracing::info!(
        filter = %config.filter,
        format = ?config.format,
        "Tracing initialized"
    );
}
