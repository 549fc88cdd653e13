//! Selection geometry: rectangular ranges, union evaluation and fill ranges.
//!
//! Everything here is pure value math with no grid state, so the
//! interaction layer and cells can recompute it on every event.

mod fill;
mod range;

pub use fill::{FillDirection, FillRange};
pub use range::{Boundary, CellRange, CellSelection, SelectionRange};
