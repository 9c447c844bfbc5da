//! Diagnostics setup.
//!
//! The hook's standard output is the rewritten prompt, so every log line goes
//! to stderr. The filter is read from `AI_DEV_KIT_LOG` using the usual
//! `EnvFilter` directive syntax and defaults to `warn`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "AI_DEV_KIT_LOG";
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Build the filter from `directive`, falling back to the default when it is
/// absent or malformed.
pub fn env_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logging() {
    let directive = std::env::var(LOG_ENV).ok();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter(directive.as_deref()))
        .with(fmt_layer)
        .try_init()
    {
        eprintln!("ai-dev-kit: logging already initialised: {}", e);
    }
}
