//! Resource limits
//!
//! Limits are read from the environment once per loader, falling back to
//! defaults when a variable is unset or unparsable.

/// Size limits applied while loading traces and plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum trace file size in bytes.
    pub max_trace_size: u64,

    /// Maximum plan file size in bytes.
    pub max_plan_size: usize,

    /// Maximum number of phases in one plan.
    pub max_phases: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_trace_size: env_or("TRACEPHASE_MAX_TRACE_SIZE", 64 * 1024 * 1024),
            max_plan_size: env_or("TRACEPHASE_MAX_PLAN_SIZE", 1024 * 1024),
            max_phases: env_or("TRACEPHASE_MAX_PHASES", 100),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
