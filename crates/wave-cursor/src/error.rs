//! Cursor error types

use crate::cursor::CursorMode;
use thiserror::Error;

/// Errors that can occur while converting, selecting or playing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CursorError {
    /// Time lies outside the known timeline `[0, total)`
    #[error("Time {time}s is outside the timeline [0, {total}s)")]
    OutOfRange { time: f64, total: f64 },

    /// Segment index does not exist
    #[error("Segment index {index} out of bounds (have {count} segments)")]
    InvalidSegment { index: usize, count: usize },

    /// Collaborators were only partially configured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Segment layout does not partition the timeline
    #[error("Invalid segment layout: {0}")]
    InvalidLayout(String),

    /// A second writer tried to modify the cursor
    #[error("Cursor is owned by the {active:?} writer, {requested:?} write rejected")]
    WriterConflict {
        active: CursorMode,
        requested: CursorMode,
    },

    /// Operation needs a laid-out timeline
    #[error("Timeline is not ready (no segment layout received yet)")]
    NotReady,
}

/// Result type for cursor operations
pub type CursorResult<T> = Result<T, CursorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CursorError::OutOfRange { time: 12.5, total: 10.0 };
        assert!(err.to_string().contains("12.5"));
        assert!(err.to_string().contains("10"));

        let err = CursorError::InvalidSegment { index: 7, count: 4 };
        assert!(err.to_string().contains('7'));
        assert!(err.to_string().contains('4'));

        let err = CursorError::WriterConflict {
            active: CursorMode::Playing,
            requested: CursorMode::Interactive,
        };
        assert!(err.to_string().contains("Playing"));
    }
}
