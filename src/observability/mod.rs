//! Observability
//!
//! Structured logging for trace verification runs. The engine emits
//! `tracing` events; this module only installs the subscriber.

pub mod logging;

pub use logging::{LogFormat, init_logging};
