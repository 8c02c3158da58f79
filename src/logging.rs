//! Logging setup
//!
//! Logs go to stderr: stdout carries widget updates for the status bar.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the given verbosity
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "claude_usage_bar=debug"
    } else {
        "claude_usage_bar=info"
    }
}

/// Build the filter, preferring `RUST_LOG` when set
fn build_filter(verbose: bool, log_level: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    match log_level {
        Some(level) => EnvFilter::new(format!("claude_usage_bar={}", normalize_level(level))),
        None => EnvFilter::new(default_directive(verbose)),
    }
}

/// Map user-facing level names onto tracing levels
fn normalize_level(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "trace" | "verbose" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}

/// Initialize the global subscriber
pub fn init(verbose: bool, json_output: bool, log_level: Option<&str>) -> anyhow::Result<()> {
    let filter = build_filter(verbose, log_level);

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()?;
    }

    Ok(())
}
