//! Error types for shape validation on the typed side of the data model

use super::position::Point;
use thiserror::Error;

/// A violation of one of the structural invariants of a node, position or point
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The `type` label of a node is empty
    #[error("node type must be a non-empty label")]
    EmptyType,

    /// The reserved key `space` was put into a node's data
    #[error("data key `{0}` is reserved and must stay unused")]
    ReservedDataKey(String),

    /// Lines are 1-indexed
    #[error("line must be 1 or greater, found {0}")]
    InvalidLine(usize),

    /// Columns are 1-indexed
    #[error("column must be 1 or greater, found {0}")]
    InvalidColumn(usize),

    /// The start of a position lies after its end
    #[error("position starts at {start} (offset {}) after its end {end} (offset {})", .start.offset, .end.offset)]
    StartAfterEnd { start: Point, end: Point },

    /// An indent entry is not a 1-indexed column
    #[error("indent column at index {index} must be 1 or greater, found {column}")]
    InvalidIndent { index: usize, column: usize },

    /// A non-empty indent needs one column per line after the first
    #[error("indent lists {found} columns but the position spans {expected} lines after its first")]
    IndentLength { expected: usize, found: usize },

    /// An offset points past the end of the source text
    #[error("offset {offset} is past the end of the source ({len} characters)")]
    OffsetOutOfBounds { offset: usize, len: usize },
}
