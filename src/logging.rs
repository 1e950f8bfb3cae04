//! # Structured Logging Module
//!
//! Environment-aware structured logging for actor lifecycles. Console output
//! is always on; `ACTORS_LOG_FORMAT=json` switches it to JSON lines for log
//! shippers. `RUST_LOG` overrides the environment-derived level.

use std::process;
use std::sync::OnceLock;

use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::detect_environment;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = detect_environment();
        let filter = build_filter(&environment);
        let json = wants_json(std::env::var("ACTORS_LOG_FORMAT").ok().as_deref());

        let console = if json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // A global subscriber may already be installed by the embedding application
        if tracing_subscriber::registry().with(console).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - keeping it");
        }

        tracing::info!(
            pid = process::id(),
            environment = %environment,
            json = json,
            "Structured logging initialized"
        );
    });
}

fn build_filter(environment: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(get_log_level(environment)))
}

fn wants_json(format: Option<&str>) -> bool {
    matches!(format, Some(value) if value.eq_ignore_ascii_case("json"))
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for actor lifecycle operations
pub fn log_actor_operation(actor: &str, operation: &str, status: &str, details: Option<&str>) {
    tracing::info!(
        actor = %actor,
        operation = %operation,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "ACTOR_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
