//! Source positions and spans.
//!
//! Every token, node and error carries a `Span` made of two `Position`s. A
//! position records the 1-based line, the 0-based column and the absolute
//! character offset into the input.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::ops::Range;

/// An absolute character offset into the source text.
pub type TextPos = u32;

/// A (line, column, index) triple.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, serde::Serialize)]
pub struct Position {
    /// 1-based line number (shifted by the `startLine` option).
    pub line: u32,
    /// 0-based column, in characters.
    pub column: u32,
    /// Absolute character offset.
    pub index: TextPos,
}

impl Position {
    #[inline]
    pub fn new(line: u32, column: u32, index: TextPos) -> Self {
        Self {
            line,
            column,
            index,
        }
    }

    /// A position `offset` characters further along the same line.
    #[inline]
    pub fn with_column_offset(self, offset: u32) -> Self {
        Self {
            line: self.line,
            column: self.column + offset,
            index: self.index + offset,
        }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.line, self.column, self.index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.line, self.column)
    }
}

/// A half-open source range `[start, end)`.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[inline]
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(end.index >= start.index);
        Self { start, end }
    }

    /// An empty span at a position.
    #[inline]
    pub fn empty(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// The length of this span in characters.
    #[inline]
    pub fn len(&self) -> TextPos {
        self.end.index - self.start.index
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.index == self.end.index
    }

    /// Whether `other` lies entirely inside this span.
    #[inline]
    pub fn contains_span(&self, other: &Span) -> bool {
        self.start.index <= other.start.index && other.end.index <= self.end.index
    }

    /// Whether this span contains the given offset.
    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start.index && pos < self.end.index
    }

    /// Convert to a character range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start.index as usize..self.end.index as usize
    }

    /// Return a new span covering both this span and the other.
    pub fn union(&self, other: &Span) -> Span {
        let start = if other.start.index < self.start.index {
            other.start
        } else {
            self.start
        };
        let end = if other.end.index > self.end.index {
            other.end
        } else {
            self.end
        };
        Span::new(start, end)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.index, self.end.index)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.index, self.end.index)
    }
}

/// The `loc` object of a serialized node.
#[derive(serde::Serialize)]
struct SourceLocation {
    start: Position,
    end: Position,
}

/// Serialized the way ESTree-family tools expect node positions:
/// `start`/`end` offsets plus a `loc` object.
impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("start", &self.start.index)?;
        map.serialize_entry("end", &self.end.index)?;
        map.serialize_entry(
            "loc",
            &SourceLocation {
                start: self.start,
                end: self.end,
            },
        )?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_bounds() {
        let span = Span::new(Position::new(1, 5, 5), Position::new(1, 15, 15));
        assert_eq!(span.len(), 10);
        assert!(span.contains(5));
        assert!(span.contains(14));
        assert!(!span.contains(15));
    }

    #[test]
    fn test_span_union_and_containment() {
        let a = Span::new(Position::new(1, 2, 2), Position::new(1, 4, 4));
        let b = Span::new(Position::new(1, 6, 6), Position::new(2, 1, 9));
        let u = a.union(&b);
        assert_eq!(u.start.index, 2);
        assert_eq!(u.end.index, 9);
        assert_eq!(u.end.line, 2);
        assert!(u.contains_span(&a));
        assert!(u.contains_span(&b));
        assert!(!a.contains_span(&u));
    }

    #[test]
    fn test_column_offset() {
        let pos = Position::new(3, 4, 20).with_column_offset(2);
        assert_eq!(pos, Position::new(3, 6, 22));
    }

    #[test]
    fn test_span_serializes_with_loc() {
        let span = Span::new(Position::new(1, 0, 0), Position::new(1, 3, 3));
        let json = serde_json::to_value(span).unwrap();
        assert_eq!(json["start"], 0);
        assert_eq!(json["end"], 3);
        assert_eq!(json["loc"]["end"]["column"], 3);
        assert_eq!(json["loc"]["start"]["line"], 1);
    }
}
