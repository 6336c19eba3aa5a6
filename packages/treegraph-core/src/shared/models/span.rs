//! Source location types
//!
//! These types represent positions in source code. Rows and columns are
//! 0-indexed and columns count bytes, matching tree-sitter's `Point`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Row/column position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Compute the point for a byte offset in `source`.
    ///
    /// Row = number of `\n` bytes before `byte`, column = bytes since the
    /// previous newline. Offsets past the end are clamped.
    pub fn for_byte(source: &str, byte: usize) -> Self {
        let bytes = source.as_bytes();
        let byte = byte.min(bytes.len());
        let prefix = &bytes[..byte];
        let row = prefix.iter().filter(|&&b| b == b'\n').count();
        let column = match prefix.iter().rposition(|&b| b == b'\n') {
            Some(nl) => byte - (nl + 1),
            None => byte,
        };
        Self { row, column }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.column)
    }
}

/// Half-open byte range `[start, end)`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `other` nests inside this range
    pub fn contains(&self, other: &ByteRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl From<std::ops::Range<usize>> for ByteRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_for_byte() {
        let source = "def f():\n    return 1\n";
        assert_eq!(Point::for_byte(source, 0), Point::new(0, 0));
        assert_eq!(Point::for_byte(source, 4), Point::new(0, 4));
        assert_eq!(Point::for_byte(source, 9), Point::new(1, 0));
        assert_eq!(Point::for_byte(source, 13), Point::new(1, 4));
        // Clamped
        assert_eq!(Point::for_byte(source, 1000), Point::new(2, 0));
    }

    #[test]
    fn test_byte_range_contains() {
        let outer = ByteRange::new(0, 10);
        assert!(outer.contains(&ByteRange::new(2, 5)));
        assert!(outer.contains(&ByteRange::new(0, 10)));
        assert!(!outer.contains(&ByteRange::new(5, 11)));
        assert_eq!(ByteRange::from(3..7).len(), 4);
        assert_eq!(ByteRange::new(4, 4).to_string(), "4..4");
    }
}
