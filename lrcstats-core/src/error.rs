//! Error handling for the alignment engine

use std::fmt;
use thiserror::Error;

use crate::cost::Cost;

/// Which of the three input sequences an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    Reference,
    Uncorrected,
    Corrected,
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SequenceKind::Reference => "reference",
            SequenceKind::Uncorrected => "uncorrected read",
            SequenceKind::Corrected => "corrected read",
        };
        f.write_str(name)
    }
}

/// Errors that abort an alignment
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("Unable to allocate {rows}x{columns} DP matrix: {reason}")]
    AllocationFailure {
        rows: usize,
        columns: usize,
        reason: String,
    },

    #[error(
        "Backtracking found no path at cell ({row}, {column}) with cost {cost} \
         (corrected read length {corrected_len}, other sequence length {other_len})"
    )]
    BacktrackInconsistency {
        row: usize,
        column: usize,
        cost: Cost,
        corrected_len: usize,
        other_len: usize,
    },

    #[error("Invalid {sequence}: {reason}")]
    InvalidInput {
        sequence: SequenceKind,
        reason: String,
    },
}

impl AlignError {
    pub fn allocation<S: Into<String>>(rows: usize, columns: usize, reason: S) -> Self {
        Self::AllocationFailure {
            rows,
            columns,
            reason: reason.into(),
        }
    }

    pub fn invalid_input<S: Into<String>>(sequence: SequenceKind, reason: S) -> Self {
        Self::InvalidInput {
            sequence,
            reason: reason.into(),
        }
    }
}

/// Result type for alignment operations
pub type AlignResult<T> = Result<T, AlignError>;
