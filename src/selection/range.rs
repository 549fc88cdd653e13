//! Rectangular ranges and per-cell selection state.

use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

/// Which edges of a range a coordinate sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Boundary {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Boundary {
    pub fn any(self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left || other.left,
            right: self.right || other.right,
            top: self.top || other.top,
            bottom: self.bottom || other.bottom,
        }
    }
}

/// A normalized rectangle of coordinates: `start` is the top-left corner and
/// `end` the bottom-right, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    start: Coordinate,
    end: Coordinate,
}

impl CellRange {
    /// Build a range from two arbitrary corners.
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self {
            start: Coordinate::new(a.x.min(b.x), a.y.min(b.y)),
            end: Coordinate::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn single(coord: Coordinate) -> Self {
        Self {
            start: coord,
            end: coord,
        }
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn end(&self) -> Coordinate {
        self.end
    }

    pub fn width(&self) -> u32 {
        self.end.x - self.start.x + 1
    }

    pub fn height(&self) -> u32 {
        self.end.y - self.start.y + 1
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.x >= self.start.x
            && coord.x <= self.end.x
            && coord.y >= self.start.y
            && coord.y <= self.end.y
    }

    pub fn is_left(&self, coord: Coordinate) -> bool {
        self.contains(coord) && coord.x == self.start.x
    }

    pub fn is_right(&self, coord: Coordinate) -> bool {
        self.contains(coord) && coord.x == self.end.x
    }

    pub fn is_top(&self, coord: Coordinate) -> bool {
        self.contains(coord) && coord.y == self.start.y
    }

    pub fn is_bottom(&self, coord: Coordinate) -> bool {
        self.contains(coord) && coord.y == self.end.y
    }

    /// All four edge flags at once. All false when `coord` is outside.
    pub fn boundary(&self, coord: Coordinate) -> Boundary {
        Boundary {
            left: self.is_left(coord),
            right: self.is_right(coord),
            top: self.is_top(coord),
            bottom: self.is_bottom(coord),
        }
    }

    /// Clamp both corners into the grid whose last coordinate is `extent`.
    #[must_use]
    pub fn clamp_to(self, extent: Coordinate) -> Self {
        Self::new(self.start.clamp_to(extent), self.end.clamp_to(extent))
    }

    /// Smallest range covering both `self` and `other`.
    #[must_use]
    pub fn union_bounds(self, other: Self) -> Self {
        Self {
            start: Coordinate::new(
                self.start.x.min(other.start.x),
                self.start.y.min(other.start.y),
            ),
            end: Coordinate::new(self.end.x.max(other.end.x), self.end.y.max(other.end.y)),
        }
    }

    /// Iterate coordinates row by row, left to right.
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> {
        let (x0, x1) = (self.start.x, self.end.x);
        (self.start.y..=self.end.y).flat_map(move |y| (x0..=x1).map(move |x| Coordinate::new(x, y)))
    }
}

/// One contiguous selected block plus the coordinate the gesture started at.
///
/// The anchor stays fixed while the range is extended by dragging or
/// Shift+arrows; the opposite corner follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    anchor: Coordinate,
    focus: Coordinate,
}

impl SelectionRange {
    pub fn new(anchor: Coordinate, focus: Coordinate) -> Self {
        Self { anchor, focus }
    }

    pub fn single(coord: Coordinate) -> Self {
        Self::new(coord, coord)
    }

    pub fn anchor(&self) -> Coordinate {
        self.anchor
    }

    pub fn focus(&self) -> Coordinate {
        self.focus
    }

    pub fn range(&self) -> CellRange {
        CellRange::new(self.anchor, self.focus)
    }

    /// Move the free corner, keeping the anchor.
    #[must_use]
    pub fn extend_to(self, focus: Coordinate) -> Self {
        Self {
            anchor: self.anchor,
            focus,
        }
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.range().contains(coord)
    }

    pub fn boundary(&self, coord: Coordinate) -> Boundary {
        self.range().boundary(coord)
    }

    #[must_use]
    pub fn clamp_to(self, extent: Coordinate) -> Self {
        Self {
            anchor: self.anchor.clamp_to(extent),
            focus: self.focus.clamp_to(extent),
        }
    }
}

impl From<CellRange> for SelectionRange {
    fn from(range: CellRange) -> Self {
        Self::new(range.start(), range.end())
    }
}

/// Selection state of one cell, folded over every active range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CellSelection {
    pub selected: bool,
    pub boundary: Boundary,
}

impl CellSelection {
    /// Selected if any range contains `coord`; each edge flag is set when
    /// some containing range has `coord` on that edge.
    pub fn evaluate<'a, I>(ranges: I, coord: Coordinate) -> Self
    where
        I: IntoIterator<Item = &'a SelectionRange>,
    {
        ranges
            .into_iter()
            .filter(|r| r.contains(coord))
            .fold(Self::default(), |acc, r| Self {
                selected: true,
                boundary: acc.boundary.union(r.boundary(coord)),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn c(x: u32, y: u32) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn new_normalizes_corners() {
        let r = CellRange::new(c(5, 1), c(2, 7));
        assert_eq!(r.start(), c(2, 1));
        assert_eq!(r.end(), c(5, 7));
        assert_eq!(r.width(), 4);
        assert_eq!(r.height(), 7);
    }

    #[test]
    fn interior_has_no_edges() {
        let r = CellRange::new(c(0, 0), c(2, 2));
        assert!(r.contains(c(1, 1)));
        assert!(!r.boundary(c(1, 1)).any());
    }

    #[test]
    fn outside_has_no_edges() {
        let r = CellRange::new(c(1, 1), c(2, 2));
        assert!(!r.contains(c(3, 1)));
        assert_eq!(r.boundary(c(3, 1)), Boundary::default());
        assert!(!r.is_left(c(1, 5)));
    }

    #[test]
    fn single_cell_is_on_every_edge() {
        let b = CellRange::single(c(4, 4)).boundary(c(4, 4));
        assert!(b.left && b.right && b.top && b.bottom);
    }

    #[test]
    fn cells_iterates_row_major() {
        let cells: Vec<_> = CellRange::new(c(1, 1), c(2, 2)).cells().collect();
        assert_eq!(cells, vec![c(1, 1), c(2, 1), c(1, 2), c(2, 2)]);
    }

    #[test]
    fn union_of_overlapping_ranges() {
        let a = SelectionRange::new(c(0, 0), c(2, 2));
        let b = SelectionRange::new(c(2, 2), c(4, 4));
        let state = CellSelection::evaluate([a, b].iter(), c(2, 2));
        assert!(state.selected);
        // (2,2) is bottom-right of `a` and top-left of `b`.
        assert_eq!(
            state.boundary,
            Boundary {
                left: true,
                right: true,
                top: true,
                bottom: true
            }
        );

        let inner = CellSelection::evaluate([a, b].iter(), c(1, 2));
        assert!(inner.selected);
        assert!(inner.boundary.bottom);
        assert!(!inner.boundary.top);
    }

    #[test]
    fn union_bounds_covers_both() {
        let a = CellRange::new(c(1, 4), c(2, 5));
        assert_eq!(
            a.union_bounds(CellRange::single(c(1, 1))),
            CellRange::new(c(1, 1), c(2, 5))
        );
        assert_eq!(a.union_bounds(CellRange::single(c(2, 4))), a);
    }

    #[test]
    fn extend_keeps_anchor() {
        let s = SelectionRange::single(c(3, 3)).extend_to(c(1, 5));
        assert_eq!(s.anchor(), c(3, 3));
        assert_eq!(s.range(), CellRange::new(c(1, 3), c(3, 5)));
    }
}
