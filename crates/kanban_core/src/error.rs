//! Recoverable failure taxonomy for storage and import/export boundaries.
//!
//! # Invariants
//! - None of these errors are fatal; every one is recovered where it occurs
//!   and surfaced as a notice.
//! - Rejected task records (`TaskValidationError`) are dropped silently and
//!   never appear here.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Store slot unreadable, or its value is not a task document.
    ReadFailure(String),
    /// Store slot unwritable; in-memory state stays authoritative.
    WriteFailure(String),
    /// External document is not valid JSON or could not be read.
    ImportParseFailure(String),
    /// External document parsed but contained no valid task.
    ImportEmptyFailure,
    /// Export document could not be serialized or written.
    ExportFailure(String),
}

impl SyncError {
    /// Stable snake_case code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ReadFailure(_) => "read_failure",
            Self::WriteFailure(_) => "write_failure",
            Self::ImportParseFailure(_) => "import_parse_failure",
            Self::ImportEmptyFailure => "import_empty_failure",
            Self::ExportFailure(_) => "export_failure",
        }
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailure(details) => write!(f, "failed to read saved tasks: {details}"),
            Self::WriteFailure(details) => write!(f, "failed to save tasks: {details}"),
            Self::ImportParseFailure(details) => write!(f, "invalid import document: {details}"),
            Self::ImportEmptyFailure => write!(f, "import document contains no valid tasks"),
            Self::ExportFailure(details) => write!(f, "failed to export tasks: {details}"),
        }
    }
}

impl Error for SyncError {}
