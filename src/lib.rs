//! `tracephase` - phase assertions over timestamped state traces
//!
//! A trace is an ordered sequence of snapshots. A verification declares
//! the phases the trace should go through, each phase a conjunction of
//! named predicates, and checks them against every entry, a timestamp
//! range, or only the first or last entry.
//!
//! The engine ([`phase`]) and façade ([`subject`]) are generic over any
//! [`trace::Snapshot`]. The [`wm`] module supplies a window-manager
//! snapshot with a predicate library, and [`plan`] reads YAML assertion
//! plans that drive the `tracephase` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod phase;
pub mod plan;
pub mod subject;
pub mod trace;
pub mod wm;
