//! vgrid - a virtualized spreadsheet-style data grid for the web
//!
//! The grid keeps rows, columns and the selection in small action/reducer
//! stores and mounts cells only for the rows and columns in view:
//! - Multi-range selection with per-cell boundary flags
//! - Fill handle that repeats a source block along one axis
//! - Pluggable cell renderers, editors and value transformers
//! - Before/after hooks around every user gesture
//! - Pinned and flex columns, tab-separated copy and paste
//!
//! # Usage (Rust)
//!
//! ```
//! use vgrid::{Grid, GridOptions, RowData};
//!
//! let grid = Grid::from_json(r#"{"columns": [{"field": "name"}]}"#).unwrap();
//! grid.append_rows(vec![RowData::new("r1").with("name", "Ada")]).unwrap();
//! assert_eq!(grid.get_cell_value("r1", "name"), Some("Ada".into()));
//! # let _ = GridOptions::default();
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { VGrid } from 'vgrid';
//! await init();
//! const grid = new VGrid({ columns: [{ field: 'name' }], rows });
//! grid.set_viewport(0, 0, 800, 600);
//! ```

pub mod cell;
pub mod error;
pub mod grid;
pub mod layout;
pub mod plugin;
pub mod scheduler;
pub mod selection;
pub mod store;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

use wasm_bindgen::prelude::*;

pub use cell::{CellContent, CellMode, CellSnapshot};
pub use error::{GridError, Result};
pub use grid::{Clipboard, Grid, HookEvent, HookKind, Hooks, MemoryClipboard};
pub use selection::{Boundary, CellRange, CellSelection, FillDirection, FillRange, SelectionRange};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use bindings::VGrid;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
