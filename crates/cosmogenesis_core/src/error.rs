//! Error types for cosmogenesis_core.
//!
//! Most construction paths return `anyhow::Result`; this enum covers the
//! failures callers are expected to match on.

use cosmogenesis_data::EventKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UniverseError {
    /// A grid needs at least one row and one column.
    #[error("Invalid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Trigger metadata belongs to a different event kind.
    #[error("Metadata mismatch: expected {expected}, found {found}")]
    MetadataMismatch {
        expected: EventKind,
        found: EventKind,
    },

    /// Cell coordinates outside the grid.
    #[error("Cell ({row}, {col}) outside {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// History snapshot encoding or decoding failed.
    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),

    /// A decoded snapshot does not match the grid it was taken from.
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

pub type Result<T> = std::result::Result<T, UniverseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UniverseError::InvalidDimensions { rows: 0, cols: 5 };
        assert_eq!(err.to_string(), "Invalid dimensions: 0x5");

        let err = UniverseError::MetadataMismatch {
            expected: EventKind::Comet,
            found: EventKind::Nebula,
        };
        assert!(err.to_string().contains("COMET"));
        assert!(err.to_string().contains("NEBULA"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err: UniverseError = io_err.into();
        assert!(matches!(err, UniverseError::Compression(_)));
    }
}
