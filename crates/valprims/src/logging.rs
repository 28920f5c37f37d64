use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Crates whose events are shown at the requested level. Everything else
/// stays at `warn`.
const VALPRIMS_TARGETS: [&str; 4] = [
    "valprims",
    "valprims_schema",
    "valprims_validate",
    "valprims_request",
];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Filter scoping `self` to the valprims crates.
    pub fn as_filter(self) -> EnvFilter {
        let mut directives = vec!["warn".to_string()];
        directives.extend(
            VALPRIMS_TARGETS
                .iter()
                .map(|target| format!("{target}={}", self.directive())),
        );
        EnvFilter::new(directives.join(","))
    }
}

/// Install the stderr subscriber. `RUST_LOG`, when set, replaces the
/// level-derived filter. Interpreter steps log at `trace`.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level.as_filter());
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(matches!(level, LogLevel::Debug | LogLevel::Trace));

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_scopes_level_to_valprims_crates() {
        let filter = LogLevel::Trace.as_filter().to_string().to_lowercase();
        assert!(filter.contains("valprims_validate=trace"));
        assert!(filter.contains("warn"));
    }
}
