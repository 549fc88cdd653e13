//! Data types shared across the grid.

mod column;
mod coordinate;
mod input;
mod menu;
mod options;
mod row;

pub use column::*;
pub use coordinate::*;
pub use input::*;
pub use menu::*;
pub use options::*;
pub use row::*;
