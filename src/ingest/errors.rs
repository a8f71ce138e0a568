//! Ingestion error types
//!
//! Only failures that abort one change reaction surface as errors; the
//! pipeline itself is never fatal. Malformed chunk lines are diagnostics
//! carried by [`ParseWarning`](crate::parser::record::ParseWarning), and a
//! shrinking log is handled internally as a forced state reset rather than
//! an error.

use std::fmt;
use std::path::PathBuf;

/// Errors that abort a single ingestion reaction.
#[derive(Debug)]
pub enum IngestError {
    /// The log could not be read at change time. The reaction is skipped;
    /// the next change notification retries from scratch.
    ResourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::ResourceUnavailable { path, source } => {
                write!(f, "log {} unreadable: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::ResourceUnavailable { source, .. } => Some(source),
        }
    }
}
