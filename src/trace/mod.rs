//! Trace model
//!
//! A [`Trace`] is an ordered, read-only sequence of timestamped snapshots
//! with optional provenance (where it was loaded from and its checksum).
//! The phase engine only ever sees `&[E]` where `E: Snapshot`.

pub mod loader;

use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::TraceError;

pub use loader::{TraceFormat, TraceLoader};

/// A point-in-time observation that can be placed on a timeline.
pub trait Snapshot {
    /// Timestamp of the observation. Trace order is authoritative when
    /// timestamps tie.
    fn timestamp(&self) -> i64;
}

/// Where a trace came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceProvenance {
    /// File the trace was read from
    pub source: PathBuf,
    /// Hex-encoded SHA-256 of the file contents, when known
    pub checksum: Option<String>,
}

impl TraceProvenance {
    /// Creates provenance for a source path without a checksum.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            checksum: None,
        }
    }

    /// Attaches a checksum.
    #[must_use]
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    /// Absolute form of the source path, falling back to the path as given.
    #[must_use]
    pub fn absolute_source(&self) -> PathBuf {
        std::path::absolute(&self.source).unwrap_or_else(|_| self.source.clone())
    }
}

/// Ordered sequence of snapshots under verification.
///
/// Entries are sorted by timestamp ascending (ties allowed). The trace is
/// never mutated after construction, so it can be shared across threads
/// and borrowed by any number of verifications.
#[derive(Debug, Clone)]
pub struct Trace<E> {
    entries: Vec<E>,
    provenance: Option<TraceProvenance>,
}

impl<E: Snapshot> Trace<E> {
    /// Builds a trace, rejecting entries whose timestamps decrease.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Unordered`] at the first out-of-order entry.
    pub fn new(entries: Vec<E>) -> Result<Self, TraceError> {
        for (index, pair) in entries.windows(2).enumerate() {
            let previous = pair[0].timestamp();
            let timestamp = pair[1].timestamp();
            if timestamp < previous {
                return Err(TraceError::Unordered {
                    index: index + 1,
                    previous,
                    timestamp,
                });
            }
        }
        Ok(Self {
            entries,
            provenance: None,
        })
    }

    /// Attaches provenance used in failure reports.
    #[must_use]
    pub fn with_provenance(mut self, provenance: TraceProvenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    /// All entries in trace order.
    #[must_use]
    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trace has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Provenance, if the trace was loaded from a file.
    #[must_use]
    pub const fn provenance(&self) -> Option<&TraceProvenance> {
        self.provenance.as_ref()
    }

    /// Source path, if known.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.provenance.as_ref().map(|p| p.source.as_path())
    }
}

impl<E: Snapshot> fmt::Display for Trace<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => write!(
                f,
                "Trace({} entries, {}..{})",
                self.entries.len(),
                first.timestamp(),
                last.timestamp()
            ),
            _ => write!(f, "Trace(empty)"),
        }
    }
}

/// Hex-encoded SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
