//! Version information display

use serde::Serialize;

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::error::TracePhaseError;
use crate::wm::WindowAssertion;

#[derive(Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
    assertions: Vec<&'static str>,
}

/// Print version information, including the assertion names plans may use.
///
/// # Errors
///
/// Returns [`TracePhaseError::Json`] if JSON serialization fails.
pub fn run(args: &VersionArgs) -> Result<(), TracePhaseError> {
    let info = VersionInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        assertions: WindowAssertion::ALL.iter().map(|a| a.name()).collect(),
    };

    match args.format {
        OutputFormat::Human => {
            println!("{} {}", info.name, info.version);
            println!("assertions: {}", info.assertions.join(", "));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&info)?);
        }
    }
    Ok(())
}
