//! Points and positions: where a node came from in its source document
//!
//! ## Types
//!
//! - [`Point`] - One place in a source file, given as line, column and offset
//! - [`Position`] - The span of a node: a start point, an end point and per-line indentation
//!
//! ## Coordinates
//!
//! - `line` and `column` are 1-indexed, `offset` is a 0-indexed character index
//! - All three coordinates of a point refer to the same location
//! - `end` is the place of the first character *after* the parsed region
//!
//! Both types display in the stringified form used across the ecosystem:
//! `3:7` for a point and `3:7-4:2` for a position.
//!
//! See [`SourceLocation`](super::location::SourceLocation) for deriving points from source text.

use super::error::ShapeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One place in a source file
///
/// Ordering compares line, then column, then offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Line in the source file, 1-indexed
    pub line: usize,
    /// Column in the source file, 1-indexed
    pub column: usize,
    /// Character in the source file, 0-indexed
    pub offset: usize,
}

impl Point {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The line/column pair, without the offset
    pub fn line_column(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Check the 1-indexed coordinates
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.line < 1 {
            return Err(ShapeError::InvalidLine(self.line));
        }
        if self.column < 1 {
            return Err(ShapeError::InvalidColumn(self.column));
        }
        Ok(())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Location of a node in a source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Place of the first character of the parsed source region
    pub start: Point,
    /// Place of the first character after the parsed source region
    pub end: Point,
    /// Start column of each line after the first, for nodes spanning multiple lines
    #[serde(default, deserialize_with = "deserialize_indent")]
    pub indent: Vec<usize>,
}

impl Position {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            indent: Vec::new(),
        }
    }

    pub fn with_indent(mut self, indent: Vec<usize>) -> Self {
        self.indent = indent;
        self
    }

    /// Number of source lines this position touches
    pub fn line_span(&self) -> usize {
        self.end.line.saturating_sub(self.start.line) + 1
    }

    pub fn is_multiline(&self) -> bool {
        self.end.line > self.start.line
    }

    /// Number of characters covered, by offset
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a point is contained within this position (by line and column)
    pub fn contains(&self, point: Point) -> bool {
        self.start.line_column() <= point.line_column()
            && point.line_column() <= self.end.line_column()
    }

    /// Check if another position overlaps with this one
    pub fn overlaps(&self, other: &Position) -> bool {
        self.contains(other.start)
            || self.contains(other.end)
            || other.contains(self.start)
            || other.contains(self.end)
    }

    /// Check if another position lies entirely within this one
    pub fn encloses(&self, other: &Position) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    /// Build the smallest position covering all provided positions.
    ///
    /// The result carries no indent: the covered lines belong to different nodes.
    pub fn bounding_box<'a, I>(mut positions: I) -> Option<Position>
    where
        I: Iterator<Item = &'a Position>,
    {
        let first = positions.next()?;
        let mut start = first.start;
        let mut end = first.end;

        for position in positions {
            start = start.min(position.start);
            end = end.max(position.end);
        }

        Some(Position::new(start, end))
    }

    /// Check both points, their order, and the indent columns.
    ///
    /// An empty indent is always accepted; otherwise it must hold one column
    /// for every line after the first.
    pub fn validate(&self) -> Result<(), ShapeError> {
        self.start.validate()?;
        self.end.validate()?;

        if self.start.line_column() > self.end.line_column() || self.start.offset > self.end.offset
        {
            return Err(ShapeError::StartAfterEnd {
                start: self.start,
                end: self.end,
            });
        }

        if let Some((index, &column)) = self.indent.iter().enumerate().find(|(_, c)| **c < 1) {
            return Err(ShapeError::InvalidIndent { index, column });
        }

        let expected = self.line_span() - 1;
        if !self.indent.is_empty() && self.indent.len() != expected {
            return Err(ShapeError::IndentLength {
                expected,
                found: self.indent.len(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Accept `indent` both as a single column and as a list of columns
fn deserialize_indent<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Indent {
        Column(usize),
        Columns(Vec<usize>),
    }

    Ok(match Indent::deserialize(deserializer)? {
        Indent::Column(column) => vec![column],
        Indent::Columns(columns) => columns,
    })
}
