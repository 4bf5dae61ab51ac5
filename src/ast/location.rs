//! Source location utilities for converting offsets to points
//!
//! Offsets count Unicode scalar values (`char`s) from the start of the
//! document, so `"wörld"` is five characters long whatever its UTF-8 width.
//! Lines break on `\n`, `\r\n` or a lone `\r`, as in the rest of the
//! ecosystem. The break belongs to the line it ends.
//!
//! Line starts are computed once, after which each conversion is a binary
//! search.

use super::error::ShapeError;
use super::position::{Point, Position};

/// Provides fast conversion between offsets and line/column points
#[derive(Debug, Clone)]
pub struct SourceLocation {
    /// Character offsets where each line starts
    line_starts: Vec<usize>,
    /// First non-blank column of each line
    line_indents: Vec<usize>,
    len: usize,
}

impl SourceLocation {
    /// Create a new SourceLocation from source text
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let mut line_indents = Vec::new();
        let mut len = 0;
        // Column of the first non-blank character on the current line, if seen
        let mut indent: Option<usize> = None;

        let mut chars = source.chars().enumerate().peekable();
        while let Some((offset, ch)) = chars.next() {
            len = offset + 1;
            let line_start = line_starts[line_starts.len() - 1];
            match ch {
                '\n' | '\r' => {
                    line_indents.push(indent.unwrap_or(offset - line_start + 1));
                    if ch == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
                        len = offset + 2;
                    }
                    line_starts.push(len);
                    indent = None;
                }
                ' ' | '\t' => {}
                _ => {
                    if indent.is_none() {
                        indent = Some(offset - line_start + 1);
                    }
                }
            }
        }
        let line_start = line_starts[line_starts.len() - 1];
        line_indents.push(indent.unwrap_or(len - line_start + 1));

        Self {
            line_starts,
            line_indents,
            len,
        }
    }

    /// Total number of characters in the source
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the total number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the offset of the start of a 1-indexed line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|index| self.line_starts.get(index))
            .copied()
    }

    /// Column of the first non-blank character on a 1-indexed line.
    ///
    /// Blank lines report the column just past their last character.
    pub fn line_indent(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|index| self.line_indents.get(index))
            .copied()
    }

    /// Convert an offset to a point. The offset just past the last character is valid.
    pub fn point_at(&self, offset: usize) -> Result<Point, ShapeError> {
        if offset > self.len {
            return Err(ShapeError::OffsetOutOfBounds {
                offset,
                len: self.len,
            });
        }

        let index = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);

        Ok(Point::new(
            index + 1,
            offset - self.line_starts[index] + 1,
            offset,
        ))
    }

    /// Convert a line/column pair to an offset.
    ///
    /// Returns `None` when the line does not exist or the column lies past the
    /// end of that line (the position right after its last character is allowed).
    pub fn offset_at(&self, line: usize, column: usize) -> Option<usize> {
        let start = self.line_start(line)?;
        let column_index = column.checked_sub(1)?;
        // The newline itself is the last addressable column of a line
        let line_end = self.line_start(line + 1).map_or(self.len, |next| next - 1);
        let offset = start + column_index;
        (offset <= line_end).then_some(offset)
    }

    /// Whether the three coordinates of a point agree with this source
    pub fn agrees(&self, point: &Point) -> bool {
        self.point_at(point.offset)
            .map(|expected| expected == *point)
            .unwrap_or(false)
    }

    /// Build the position of the region `start..end`, with one indent entry per
    /// line after the first.
    pub fn position_between(&self, start: usize, end: usize) -> Result<Position, ShapeError> {
        let start_point = self.point_at(start)?;
        let end_point = self.point_at(end)?;

        if start > end {
            return Err(ShapeError::StartAfterEnd {
                start: start_point,
                end: end_point,
            });
        }

        let indent = ((start_point.line + 1)..=end_point.line)
            .filter_map(|line| self.line_indent(line))
            .collect();

        Ok(Position::new(start_point, end_point).with_indent(indent))
    }
}
