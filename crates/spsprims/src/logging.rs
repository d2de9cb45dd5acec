//! Stderr diagnostics for the CLI.
//!
//! Call and signature events come from the library crates, so the level
//! chosen on the command line is applied per crate target. Everything else
//! stays at `warn`.

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

/// Target prefix shared by every crate in the workspace.
const SPSPRIMS_TARGET: &str = "spsprims";

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

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

fn targets(level: LogLevel) -> Targets {
    Targets::new()
        .with_default(LevelFilter::WARN)
        .with_target(SPSPRIMS_TARGET, level)
}

type BoxedLayer = Box<dyn tracing_subscriber::Layer<Registry> + Send + Sync>;

fn stderr_layer(format: LogFormat) -> BoxedLayer {
    let layer = fmt::layer().with_writer(std::io::stderr).with_ansi(false);
    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().with_current_span(false).boxed(),
    }
}

/// Install the stderr subscriber. Stdout carries command output only.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let _ = tracing_subscriber::registry()
        .with(stderr_layer(format).with_filter(targets(level)))
        .try_init();
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn chosen_level_applies_to_call_and_sig_events() {
        let filter = targets(LogLevel::Trace);
        assert!(filter.would_enable("spsprims_call::dispatch", &Level::TRACE));
        assert!(filter.would_enable("spsprims_sig::codec", &Level::TRACE));
        assert!(filter.would_enable("spsprims::cmd::doctor", &Level::DEBUG));
    }

    #[test]
    fn other_crates_stay_at_warn() {
        let filter = targets(LogLevel::Trace);
        assert!(!filter.would_enable("clap_builder::parser", &Level::INFO));
        assert!(filter.would_enable("clap_builder::parser", &Level::WARN));
    }

    #[test]
    fn error_level_silences_library_debug() {
        let filter = targets(LogLevel::Error);
        assert!(!filter.would_enable("spsprims_call::registry", &Level::DEBUG));
        assert!(filter.would_enable("spsprims_call::registry", &Level::ERROR));
    }
}
