//! Tracing setup for the server binary.
//!
//! `LOG_LEVEL` takes an `EnvFilter` directive string; when unset or invalid the
//! built-in directives below apply. `LOG_FORMAT=json` switches to one JSON
//! object per event, anything else keeps the human-readable output.
//!
//! Targets: `challenge` carries generation outcomes (generated vs fallback),
//! `codequiz_backend` carries startup and config events.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,challenge=debug,codequiz_backend=debug,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Interpret a `LOG_FORMAT` value; unknown values fall back to `Pretty`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").ok();
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from(level.as_deref()))
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
