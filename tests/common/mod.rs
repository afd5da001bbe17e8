//! Shared integration-test helpers: fixture paths, in-memory traces, and
//! running the `tracephase` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

use tracephase::phase::{NamedPredicate, Verdict};
use tracephase::trace::{Snapshot, Trace};

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Runs the binary with `args`, logging disabled, and waits for it.
#[allow(clippy::missing_panics_doc)]
pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tracephase"))
        .args(args)
        .env_remove("TRACEPHASE_LOG_LEVEL")
        .env_remove("TRACEPHASE_TRACE")
        .env_remove("TRACEPHASE_PLAN")
        .output()
        .expect("failed to spawn tracephase")
}

/// Minimal snapshot: a timestamp and a boolean signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub timestamp: i64,
    pub on: bool,
}

impl Snapshot for Tick {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Builds a trace with timestamps `0, 10, 20, ...`.
#[allow(clippy::missing_panics_doc)]
pub fn ticks(signals: &[bool]) -> Trace<Tick> {
    let entries = signals
        .iter()
        .zip((0_i64..).step_by(10))
        .map(|(&on, timestamp)| Tick { timestamp, on })
        .collect();
    Trace::new(entries).expect("timestamps are increasing")
}

pub fn is_on() -> NamedPredicate<Tick> {
    NamedPredicate::new("on", |t: &Tick| {
        if t.on {
            Verdict::pass("signal on")
        } else {
            Verdict::fail("signal off")
        }
    })
}

pub fn is_off() -> NamedPredicate<Tick> {
    NamedPredicate::new("off", |t: &Tick| {
        if t.on {
            Verdict::fail("signal on")
        } else {
            Verdict::pass("signal off")
        }
    })
}
