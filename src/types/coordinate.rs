use serde::{Deserialize, Serialize};

/// Grid-position address used for geometry: `x` is the display column index,
/// `y` the row index. Both are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Offset by signed deltas, saturating at zero.
    #[must_use]
    pub fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: offset_axis(self.x, dx),
            y: offset_axis(self.y, dy),
        }
    }

    /// Clamp into `[0, extent.x] x [0, extent.y]` where `extent` is the last
    /// valid coordinate of the grid.
    #[must_use]
    pub fn clamp_to(self, extent: Coordinate) -> Self {
        Self {
            x: self.x.min(extent.x),
            y: self.y.min(extent.y),
        }
    }
}

fn offset_axis(value: u32, delta: i64) -> u32 {
    let moved = i64::from(value).saturating_add(delta).max(0);
    u32::try_from(moved).unwrap_or(u32::MAX)
}

/// Logical address used by the stores: a row id and a column field.
///
/// Unlike [`Coordinate`] this does not change when rows or columns are
/// reordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: String,
    pub column: String,
}

impl CellPosition {
    pub fn new(row: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            row: row.into(),
            column: column.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_saturates_at_zero() {
        assert_eq!(Coordinate::new(1, 1).offset(-3, 2), Coordinate::new(0, 3));
    }

    #[test]
    fn clamp_to_extent() {
        let extent = Coordinate::new(4, 9);
        assert_eq!(Coordinate::new(7, 3).clamp_to(extent), Coordinate::new(4, 3));
        assert_eq!(Coordinate::new(2, 12).clamp_to(extent), Coordinate::new(2, 9));
    }
}
