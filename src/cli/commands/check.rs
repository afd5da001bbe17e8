//! Trace verification command
//!
//! Loads the plan first so a broken plan is reported without touching the
//! trace, then loads and checksums the trace and applies the plan.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::cli::args::{CheckArgs, OutputFormat};
use crate::config::Limits;
use crate::error::{TracePhaseError, VerifyError};
use crate::plan::PlanLoader;
use crate::subject::FailureReport;
use crate::trace::TraceLoader;

#[derive(Serialize)]
struct CheckOutput<'a> {
    plan: Option<&'a str>,
    trace: &'a Path,
    entries: usize,
    checksum: Option<&'a str>,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a FailureReport>,
}

/// Check a trace file against an assertion plan.
///
/// A failed verification prints its report to stdout and is returned as
/// [`VerifyError::Failed`].
///
/// # Errors
///
/// Returns plan, trace, or verification errors.
pub fn run(args: &CheckArgs) -> Result<(), TracePhaseError> {
    let limits = Limits::default();

    let loaded = PlanLoader::new(limits.clone()).load(&args.plan)?;
    for warning in &loaded.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    let plan = loaded.plan;

    let trace = TraceLoader::new(limits).load(&args.trace, args.checksum.as_deref())?;

    let report = match plan.apply(&trace) {
        Ok(()) => None,
        Err(VerifyError::Failed(report)) => Some(report),
        Err(misuse @ VerifyError::Misuse(_)) => return Err(misuse.into()),
    };

    info!(
        plan = plan.name().unwrap_or("<unnamed>"),
        trace = %args.trace.display(),
        passed = report.is_none(),
        "verification finished"
    );

    match args.format {
        OutputFormat::Human => match &report {
            None => println!(
                "PASS {} ({} entries)",
                plan.name().unwrap_or_else(|| plan_label(&args.plan)),
                trace.len()
            ),
            Some(report) => println!("{report}"),
        },
        OutputFormat::Json => {
            let output = CheckOutput {
                plan: plan.name(),
                trace: &args.trace,
                entries: trace.len(),
                checksum: trace.provenance().and_then(|p| p.checksum.as_deref()),
                passed: report.is_none(),
                report: report.as_ref(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    match report {
        None => Ok(()),
        Some(report) => Err(VerifyError::Failed(report).into()),
    }
}

fn plan_label(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("plan")
}
