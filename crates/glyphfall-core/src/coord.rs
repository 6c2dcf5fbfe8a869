//! Terminal cell coordinates.

use std::fmt;

/// A terminal cell position.
///
/// Columns grow to the right and rows grow downward, both zero-based and
/// relative to the top-left corner of the output area. Negative values are
/// legal and describe cells outside the visible area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub column: i32,
    pub row: i32,
}

impl Coord {
    /// Create a new coordinate.
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Return this coordinate shifted by the given offsets.
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self {
            column: self.column + columns,
            row: self.row + rows,
        }
    }
}

impl From<(i32, i32)> for Coord {
    fn from((column, row): (i32, i32)) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        assert_eq!(Coord::new(3, 4), Coord::from((3, 4)));
        assert_ne!(Coord::new(3, 4), Coord::new(4, 3));
    }

    #[test]
    fn offset_moves_both_axes() {
        assert_eq!(Coord::new(1, 1).offset(-2, 5), Coord::new(-1, 6));
    }
}
