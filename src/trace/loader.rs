//! Window-manager trace loading
//!
//! Reads a trace document, checks its size and claimed checksum, decodes
//! it, and verifies timestamp ordering. All of this happens before any
//! phase is evaluated.
//!
//! Document shape (JSON or YAML):
//!
//! ```yaml
//! entries:
//!   - timestamp: 0
//!     windows:
//!       - { title: StatusBar, kind: above_app, visible: true }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Limits;
use crate::error::TraceError;
use crate::wm::WindowManagerEntry;

use super::{Trace, TraceProvenance, sha256_hex};

/// Encoding of a trace document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    /// JSON document
    Json,
    /// YAML document
    Yaml,
}

impl TraceFormat {
    /// Picks the format from the file extension: `.json` is JSON,
    /// anything else is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TraceDocument {
    #[serde(default)]
    entries: Vec<WindowManagerEntry>,
}

/// Loads window-manager traces.
#[derive(Debug, Clone, Default)]
pub struct TraceLoader {
    limits: Limits,
}

impl TraceLoader {
    /// Creates a loader with the given limits.
    #[must_use]
    pub const fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Decodes a trace from bytes. `label` names the input in errors.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Parse`] if decoding fails and
    /// [`TraceError::Unordered`] if timestamps decrease.
    pub fn parse(
        &self,
        bytes: &[u8],
        format: TraceFormat,
        label: &str,
    ) -> Result<Trace<WindowManagerEntry>, TraceError> {
        let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
        let document: TraceDocument = match format {
            TraceFormat::Json => serde_json::from_slice(bytes).map_err(|e| TraceError::Parse {
                path: label.to_string(),
                message: e.to_string(),
            })?,
            TraceFormat::Yaml => serde_yaml::from_slice(bytes).map_err(|e| TraceError::Parse {
                path: label.to_string(),
                message: e.to_string(),
            })?,
        };

        debug!(
            entries = document.entries.len(),
            input = label,
            "decoded trace"
        );
        Trace::new(document.entries)
    }

    /// Reads and decodes the trace at `path`.
    ///
    /// When `expected_checksum` is given it must match the SHA-256 of the
    /// file (hex, case-insensitive). The computed checksum is recorded in
    /// the trace's provenance either way.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`], [`TraceError::TooLarge`],
    /// [`TraceError::ChecksumMismatch`], or any error from [`parse`](Self::parse).
    pub fn load(
        &self,
        path: &Path,
        expected_checksum: Option<&str>,
    ) -> Result<Trace<WindowManagerEntry>, TraceError> {
        let io_err = |source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        };

        let size = std::fs::metadata(path).map_err(io_err)?.len();
        if size > self.limits.max_trace_size {
            return Err(TraceError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.limits.max_trace_size,
            });
        }

        let bytes = std::fs::read(path).map_err(io_err)?;
        let checksum = sha256_hex(&bytes);

        if let Some(expected) = expected_checksum {
            if !expected.trim().eq_ignore_ascii_case(&checksum) {
                return Err(TraceError::ChecksumMismatch {
                    path: path.to_path_buf(),
                    expected: expected.to_string(),
                    actual: checksum,
                });
            }
        }

        let label = path.display().to_string();
        let trace = self.parse(&bytes, TraceFormat::from_path(path), &label)?;
        info!(trace = %label, entries = trace.len(), %checksum, "loaded trace");

        Ok(trace.with_provenance(TraceProvenance::new(path).with_checksum(checksum)))
    }
}
