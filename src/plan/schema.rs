//! Assertion plan schema
//!
//! Types deserialized from plan YAML. Assertion names are kept as plain
//! strings here so validation can report every unknown name with a
//! suggestion instead of failing on the first one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root of a plan file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    /// Optional human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Which entries to check
    #[serde(default)]
    pub mode: PlanMode,

    /// Inclusive timestamp range, required when `mode` is `range`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeSpec>,

    /// Ignore leading entries until the first phase holds
    #[serde(default)]
    pub skip_until_first: bool,

    /// Phases in order; each is a list of `<assertion>: <window>` maps
    #[serde(default)]
    pub phases: Vec<Vec<IndexMap<String, String>>>,
}

/// Evaluation mode as written in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// Every entry, phase by phase
    #[default]
    All,
    /// Entries within `range`, phase by phase
    Range,
    /// First entry only
    First,
    /// Last entry only
    Last,
}

/// Inclusive timestamp range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeSpec {
    /// First timestamp included
    pub start: i64,
    /// Last timestamp included
    pub end: i64,
}
