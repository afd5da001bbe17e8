//! Logging setup for the `tracephase` binary.
//!
//! Each `-v` raises the level of this crate's own events; other crates stay
//! at `warn`. At `-vvv` every predicate call the engine makes is logged
//! from `tracephase::phase::group`, with targets shown so the phase checker,
//! the loaders and the façade can be told apart. `TRACEPHASE_LOG_LEVEL`
//! replaces the computed filter entirely.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable holding a full `EnvFilter` directive.
pub const LOG_LEVEL_ENV: &str = "TRACEPHASE_LOG_LEVEL";

/// How log events are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Level of `tracephase` events for a `-v` count.
///
/// `-v` loads and outcomes, `-vv` phase transitions, `-vvv` predicate
/// calls.
#[must_use]
pub const fn crate_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Filter directive for a `-v` count, e.g. `warn,tracephase=debug`.
#[must_use]
pub fn filter_directive(verbosity: u8) -> String {
    match verbosity {
        0 => "warn".to_string(),
        _ => format!("warn,{}={}", env!("CARGO_CRATE_NAME"), crate_level(verbosity)),
    }
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    // Targets matter once predicate tracing mixes in with checker events.
    let show_target = verbosity >= 2;

    let use_ansi = match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    match format {
        LogFormat::Human => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(use_ansi)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
