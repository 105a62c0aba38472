//! Error types for the Ring Registry
//!
//! Provides structured error types for registry mutations and command
//! script processing, with a coarse classification used by callers to
//! distinguish bad script text from bad station references.

use thiserror::Error;

use crate::ring::StationId;

/// Unified error type for the registry
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Registry Errors
    // =========================================================================
    #[error("Station not found: {station}")]
    StationNotFound { station: StationId },

    #[error("Station already exists: {station}")]
    StationExists { station: StationId },

    #[error("Ring requires at least {min} stations, got {count}")]
    TooFewStations { min: usize, count: usize },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Command parse error: {0}")]
    CommandParse(String),

    #[error("Script parse error at line {line}: {reason}")]
    ScriptParse { line: usize, reason: String },

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an error for callers that only need to know
/// how a run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The script text itself is unusable (bad tokens, counts, or lines)
    MalformedInput,
    /// A command named a station that is not live, or reused a live number
    InvalidReference,
    /// The input or output stream failed
    Io,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::StationNotFound { .. } | Error::StationExists { .. } => {
                ErrorKind::InvalidReference
            }

            Error::TooFewStations { .. }
            | Error::CommandParse(_)
            | Error::ScriptParse { .. } => ErrorKind::MalformedInput,

            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Check if this error came from unusable script text
    pub fn is_malformed_input(&self) -> bool {
        matches!(self.kind(), ErrorKind::MalformedInput)
    }

    /// Check if this error came from a bad station reference
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidReference)
    }
}

/// Result type alias for the registry
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = Error::StationNotFound {
            station: StationId::new(7),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidReference);

        let err = Error::StationExists {
            station: StationId::new(4),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidReference);

        let err = Error::ScriptParse {
            line: 3,
            reason: "bad token".into(),
        };
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        let err = Error::TooFewStations { min: 2, count: 1 };
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_error_kind_helpers() {
        let reference = Error::StationNotFound {
            station: StationId::new(9),
        };
        assert!(reference.is_invalid_reference());
        assert!(!reference.is_malformed_input());

        let parse = Error::CommandParse("unknown command".into());
        assert!(parse.is_malformed_input());
        assert!(!parse.is_invalid_reference());
    }

    #[test]
    fn test_error_display() {
        let err = Error::StationNotFound {
            station: StationId::new(12),
        };
        assert_eq!(err.to_string(), "Station not found: 12");

        let err = Error::ScriptParse {
            line: 5,
            reason: "expected 2 integers".into(),
        };
        assert_eq!(
            err.to_string(),
            "Script parse error at line 5: expected 2 integers"
        );
    }
}
