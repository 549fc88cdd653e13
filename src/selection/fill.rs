//! Fill-handle geometry.

use serde::Serialize;

use super::{CellRange, SelectionRange};
use crate::types::{Coordinate, Fillable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FillDirection {
    Up,
    Down,
    Left,
    Right,
}

impl FillDirection {
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// A selection extended by dragging the fill handle.
///
/// `range` covers the source plus the extension; the extension always grows
/// along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FillRange {
    source: CellRange,
    range: CellRange,
    direction: FillDirection,
}

impl FillRange {
    /// Extend `source` towards `pointer`.
    ///
    /// The axis with the larger distance from the nearest source edge wins;
    /// equal distances prefer the vertical axis. Axes not allowed by
    /// `fillable` are ignored. The pointer is clamped to `extent` (the last
    /// valid coordinate) first. Returns `None` when the pointer is inside the
    /// source or only moved along a disallowed axis.
    pub fn compute(
        source: CellRange,
        pointer: Coordinate,
        extent: Coordinate,
        fillable: Fillable,
    ) -> Option<Self> {
        let source = source.clamp_to(extent);
        let p = pointer.clamp_to(extent);
        let (start, end) = (source.start(), source.end());

        let dx = axis_delta(p.x, start.x, end.x);
        let dy = axis_delta(p.y, start.y, end.y);
        let vertical = fillable.allows_y() && dy != 0;
        let horizontal = fillable.allows_x() && dx != 0;

        let direction = match (vertical, horizontal) {
            (true, true) if dy.unsigned_abs() >= dx.unsigned_abs() => vertical_dir(dy),
            (true, true) | (false, true) => horizontal_dir(dx),
            (true, false) => vertical_dir(dy),
            (false, false) => return None,
        };

        // Project the pointer onto the fill axis; the source keeps the other.
        let reach = if direction.is_vertical() {
            Coordinate::new(start.x, p.y)
        } else {
            Coordinate::new(p.x, start.y)
        };
        let range = source.union_bounds(CellRange::single(reach));

        Some(Self {
            source,
            range,
            direction,
        })
    }

    pub fn source(&self) -> CellRange {
        self.source
    }

    pub fn range(&self) -> CellRange {
        self.range
    }

    pub fn direction(&self) -> FillDirection {
        self.direction
    }

    /// The whole filled range as a selection, anchored on the source corner
    /// opposite the extension.
    pub fn selection(&self) -> SelectionRange {
        match self.direction {
            FillDirection::Down | FillDirection::Right => {
                SelectionRange::new(self.range.start(), self.range.end())
            }
            FillDirection::Up | FillDirection::Left => {
                SelectionRange::new(self.range.end(), self.range.start())
            }
        }
    }

    /// The newly covered part of the range, excluding the source.
    pub fn extension(&self) -> CellRange {
        let (s, e) = (self.source.start(), self.source.end());
        let (rs, re) = (self.range.start(), self.range.end());
        match self.direction {
            FillDirection::Down => CellRange::new(Coordinate::new(s.x, e.y + 1), re),
            FillDirection::Up => CellRange::new(rs, Coordinate::new(e.x, s.y - 1)),
            FillDirection::Right => CellRange::new(Coordinate::new(e.x + 1, s.y), re),
            FillDirection::Left => CellRange::new(rs, Coordinate::new(s.x - 1, e.y)),
        }
    }

    /// The source cell whose value is copied into `target`.
    ///
    /// The source pattern repeats away from the source edge, so filling
    /// upwards cycles from the bottom row of the source.
    pub fn source_for(&self, target: Coordinate) -> Coordinate {
        let (s, e) = (self.source.start(), self.source.end());
        let (w, h) = (self.source.width(), self.source.height());
        match self.direction {
            FillDirection::Down => Coordinate::new(target.x, s.y + (target.y - e.y - 1) % h),
            FillDirection::Up => Coordinate::new(target.x, e.y - (s.y - 1 - target.y) % h),
            FillDirection::Right => Coordinate::new(s.x + (target.x - e.x - 1) % w, target.y),
            FillDirection::Left => Coordinate::new(e.x - (s.x - 1 - target.x) % w, target.y),
        }
    }
}

/// Signed distance from the `[lo, hi]` span; zero when inside.
fn axis_delta(p: u32, lo: u32, hi: u32) -> i64 {
    if p > hi {
        i64::from(p - hi)
    } else if p < lo {
        -i64::from(lo - p)
    } else {
        0
    }
}

fn vertical_dir(dy: i64) -> FillDirection {
    if dy > 0 {
        FillDirection::Down
    } else {
        FillDirection::Up
    }
}

fn horizontal_dir(dx: i64) -> FillDirection {
    if dx > 0 {
        FillDirection::Right
    } else {
        FillDirection::Left
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EXTENT: Coordinate = Coordinate::new(9, 9);

    fn c(x: u32, y: u32) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn extends_down() {
        let fill = FillRange::compute(CellRange::single(c(2, 2)), c(2, 5), EXTENT, Fillable::Xy)
            .unwrap();
        assert_eq!(fill.range(), CellRange::new(c(2, 2), c(2, 5)));
        assert_eq!(fill.direction(), FillDirection::Down);
        assert_eq!(fill.extension(), CellRange::new(c(2, 3), c(2, 5)));
    }

    #[test]
    fn extends_right() {
        let fill = FillRange::compute(CellRange::single(c(2, 2)), c(6, 2), EXTENT, Fillable::Xy)
            .unwrap();
        assert_eq!(fill.range(), CellRange::new(c(2, 2), c(6, 2)));
        assert_eq!(fill.direction(), FillDirection::Right);
    }

    #[test]
    fn tie_prefers_vertical() {
        let fill = FillRange::compute(CellRange::single(c(2, 2)), c(4, 4), EXTENT, Fillable::Xy)
            .unwrap();
        assert_eq!(fill.direction(), FillDirection::Down);
        assert_eq!(fill.range(), CellRange::new(c(2, 2), c(2, 4)));
    }

    #[test]
    fn pointer_inside_source_is_no_fill() {
        let src = CellRange::new(c(1, 1), c(3, 3));
        assert_eq!(FillRange::compute(src, c(2, 2), EXTENT, Fillable::Xy), None);
    }

    #[test]
    fn disallowed_axis_is_ignored() {
        let src = CellRange::single(c(2, 2));
        assert_eq!(FillRange::compute(src, c(6, 2), EXTENT, Fillable::Y), None);
        let fill = FillRange::compute(src, c(6, 3), EXTENT, Fillable::X).unwrap();
        assert_eq!(fill.direction(), FillDirection::Right);
    }

    #[test]
    fn clamps_to_extent() {
        let fill = FillRange::compute(CellRange::single(c(2, 2)), c(2, 40), EXTENT, Fillable::Y)
            .unwrap();
        assert_eq!(fill.range().end(), c(2, 9));
    }

    #[test]
    fn up_fill_cycles_from_bottom() {
        let src = CellRange::new(c(0, 4), c(0, 5));
        let fill = FillRange::compute(src, c(0, 1), EXTENT, Fillable::Y).unwrap();
        assert_eq!(fill.direction(), FillDirection::Up);
        assert_eq!(fill.extension(), CellRange::new(c(0, 1), c(0, 3)));
        assert_eq!(fill.source_for(c(0, 3)), c(0, 5));
        assert_eq!(fill.source_for(c(0, 2)), c(0, 4));
        assert_eq!(fill.source_for(c(0, 1)), c(0, 5));
    }

    #[test]
    fn selection_is_anchored_inside_the_source() {
        let up = FillRange::compute(CellRange::new(c(0, 4), c(1, 5)), c(0, 1), EXTENT, Fillable::Xy)
            .unwrap();
        assert_eq!(up.selection(), SelectionRange::new(c(1, 5), c(0, 1)));
        assert_eq!(up.selection().range(), CellRange::new(c(0, 1), c(1, 5)));

        let left =
            FillRange::compute(CellRange::new(c(1, 0), c(2, 2)), c(0, 1), EXTENT, Fillable::Xy)
                .unwrap();
        assert_eq!(left.direction(), FillDirection::Left);
        assert_eq!(left.selection().range(), CellRange::new(c(0, 0), c(2, 2)));
        assert!(left.source().contains(left.selection().anchor()));

        let down = FillRange::compute(CellRange::single(c(2, 2)), c(2, 5), EXTENT, Fillable::Xy)
            .unwrap();
        assert_eq!(down.selection(), SelectionRange::new(c(2, 2), c(2, 5)));
    }

    #[test]
    fn down_fill_repeats_pattern() {
        let src = CellRange::new(c(0, 0), c(0, 1));
        let fill = FillRange::compute(src, c(0, 4), EXTENT, Fillable::Y).unwrap();
        assert_eq!(fill.source_for(c(0, 2)), c(0, 0));
        assert_eq!(fill.source_for(c(0, 3)), c(0, 1));
        assert_eq!(fill.source_for(c(0, 4)), c(0, 0));
    }
}
