//! The grid facade: the operations embedding applications call.
//!
//! A [`Grid`] owns the row, column and selection stores, the hook table, the
//! plugin registry and the scheduler. It mounts cells for the rows and
//! columns the viewport shows (plus a preload margin), keeps them in step
//! when rows or columns change, and tells them when they become visible.

mod clipboard;
pub mod events;
mod interaction;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use events::{AfterHook, BeforeHook, HookEvent, HookId, HookKind, Hooks};
pub use interaction::FILL_HANDLE_SIZE;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::cell::{self, CellHost, CellSnapshot, MountContext, MountedCell};
use crate::error::{GridError, Result};
use crate::layout::{Extent, Viewport};
use crate::plugin::{CellEditor, CellRenderer, PluginRegistry, Transformer};
use crate::scheduler::{Scheduler, TaskHandle, VisibilityObserver};
use crate::selection::SelectionRange;
use crate::store::{
    ColumnAction, ColumnActionKind, ColumnStore, RowAction, RowActionKind, RowStore,
    SelectionAction, SelectionStore, ROW_NUMBER_FIELD,
};
use crate::types::{
    CellPosition, ColumnDef, ColumnMenuParams, ColumnOptions, ContextMenuParams, Coordinate,
    GridOptions, MenuItem, Pinned, RowData,
};

use interaction::DragState;

pub type ContextMenuProvider = Rc<dyn Fn(&Grid, &ContextMenuParams) -> Vec<MenuItem>>;
pub type ColumnMenuProvider = Rc<dyn Fn(&Grid, &ColumnMenuParams) -> Vec<MenuItem>>;

/// Log a failed internal dispatch instead of surfacing it.
fn logged<T>(result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(%err, "dispatch failed");
            None
        }
    }
}

pub(crate) struct GridInner {
    options: GridOptions,
    rows: RowStore,
    columns: ColumnStore,
    selection: SelectionStore,
    hooks: Hooks,
    plugins: RefCell<PluginRegistry>,
    scheduler: Rc<Scheduler>,
    visibility: Rc<VisibilityObserver<CellPosition>>,
    viewport: Cell<Viewport>,
    drag: Cell<DragState>,
    cells: RefCell<HashMap<CellPosition, MountedCell>>,
    clipboard: RefCell<Box<dyn Clipboard>>,
    context_menu: RefCell<Option<ContextMenuProvider>>,
    column_menu: RefCell<Option<ColumnMenuProvider>>,
    this: Weak<GridInner>,
}

/// A virtualized data grid. Cloning yields another handle to the same grid.
#[derive(Clone)]
pub struct Grid {
    inner: Rc<GridInner>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.inner.rows.row_count())
            .field("columns", &self.inner.columns.column_count())
            .field("mounted", &self.inner.cells.borrow().len())
            .finish()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GridOptions::default())
    }
}

impl Grid {
    pub fn new(mut options: GridOptions) -> Self {
        options.sanitize();
        let initial_rows = std::mem::take(&mut options.rows);
        let columns: Vec<ColumnOptions> = options
            .columns
            .iter()
            .cloned()
            .map(|def| ColumnOptions::resolve(def, &options.default_column_option))
            .collect();

        let scheduler = Rc::new(Scheduler::new());
        let inner = Rc::new_cyclic(|this| GridInner {
            rows: RowStore::new(),
            columns: ColumnStore::new(),
            selection: SelectionStore::new(),
            hooks: Hooks::new(),
            plugins: RefCell::new(PluginRegistry::with_builtins()),
            visibility: VisibilityObserver::new(Rc::clone(&scheduler)),
            scheduler,
            viewport: Cell::new(Viewport::new()),
            drag: Cell::new(DragState::Idle),
            cells: RefCell::new(HashMap::new()),
            clipboard: RefCell::new(Box::new(MemoryClipboard::new())),
            context_menu: RefCell::new(None),
            column_menu: RefCell::new(None),
            this: Weak::clone(this),
            options,
        });
        let grid = Self { inner };
        grid.install_listeners();

        let width = grid.inner.viewport.get().width;
        logged(grid.inner.columns.dispatch(ColumnAction::SetContainerWidth(width)));
        logged(grid.inner.columns.dispatch(ColumnAction::SetColumns(columns)));
        if !initial_rows.is_empty() {
            logged(grid.inner.rows.dispatch(RowAction::AppendRows(initial_rows)));
        }
        tracing::debug!(
            rows = grid.inner.rows.row_count(),
            columns = grid.inner.columns.column_count(),
            "grid created"
        );
        grid
    }

    /// Build a grid from JSON options.
    ///
    /// # Errors
    /// Returns [`crate::GridError::Options`] if the JSON does not describe valid
    /// options.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(GridOptions::from_json(json)?))
    }

    /// Remount cells whenever rows or columns change shape.
    fn install_listeners(&self) {
        for kind in [
            RowActionKind::AppendRows,
            RowActionKind::TakeRows,
            RowActionKind::Clear,
        ] {
            let weak = Rc::downgrade(&self.inner);
            self.inner.rows.subscribe(kind, move |_, _| {
                if let Some(inner) = weak.upgrade() {
                    Grid { inner }.structure_changed();
                }
            });
        }
        for kind in ColumnActionKind::ALL {
            let weak = Rc::downgrade(&self.inner);
            self.inner.columns.subscribe(kind, move |_, _| {
                if let Some(inner) = weak.upgrade() {
                    Grid { inner }.structure_changed();
                }
            });
        }
    }

    pub fn options(&self) -> &GridOptions {
        &self.inner.options
    }

    pub fn rows(&self) -> &RowStore {
        &self.inner.rows
    }

    pub fn columns(&self) -> &ColumnStore {
        &self.inner.columns
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.inner.selection
    }

    pub fn hooks(&self) -> &Hooks {
        &self.inner.hooks
    }

    pub fn scheduler(&self) -> &Rc<Scheduler> {
        &self.inner.scheduler
    }

    // Rows

    /// Add rows. Rows whose id already exists replace the stored row in place.
    ///
    /// # Errors
    /// Only fails if the row store lost its reducer.
    pub fn append_rows(&self, rows: Vec<RowData>) -> Result<()> {
        self.inner.rows.dispatch(RowAction::AppendRows(rows))?;
        Ok(())
    }

    /// # Errors
    /// Only fails if the row store lost its reducer.
    pub fn remove_rows<I, S>(&self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = ids.into_iter().map(Into::into).collect();
        self.inner.rows.dispatch(RowAction::TakeRows(ids))?;
        Ok(())
    }

    /// # Errors
    /// Only fails if the row store lost its reducer.
    pub fn clear_rows(&self) -> Result<()> {
        self.inner.rows.dispatch(RowAction::Clear)?;
        Ok(())
    }

    /// Cell value as shown: the raw value passed through the column's
    /// transformer. `None` if the row or column does not exist.
    pub fn get_cell_value(&self, row: &str, field: &str) -> Option<Value> {
        let column = self.get_column_options(field);
        if column.is_none() && field != ROW_NUMBER_FIELD {
            return None;
        }
        self.inner.rows.row_index(row)?;
        let raw = self
            .inner
            .rows
            .raw_cell_value(row, field)
            .unwrap_or(Value::Null);
        Some(
            match column.as_deref().and_then(|c| self.transformer_for(c)) {
                Some(transformer) => transformer.read(&raw),
                None => raw,
            },
        )
    }

    /// Stored value of a cell, without any transformer.
    pub fn get_raw_cell_value(&self, row: &str, field: &str) -> Option<Value> {
        self.inner.rows.raw_cell_value(row, field)
    }

    /// Store `value` as-is. Unknown rows are ignored.
    ///
    /// # Errors
    /// Only fails if the row store lost its reducer.
    pub fn set_cell_value(&self, row: &str, field: &str, value: Value) -> Result<()> {
        self.inner.rows.dispatch(RowAction::SetCellValue {
            row: row.to_string(),
            column: field.to_string(),
            value,
        })?;
        Ok(())
    }

    // Columns

    pub fn get_column_options(&self, field: &str) -> Option<Rc<ColumnOptions>> {
        self.inner.columns.column(field)
    }

    /// Replace all columns, resolving them against the grid's default column
    /// options.
    ///
    /// # Errors
    /// Only fails if the column store lost its reducer.
    pub fn set_columns(&self, columns: Vec<ColumnDef>) -> Result<()> {
        let defaults = &self.inner.options.default_column_option;
        let resolved = columns
            .into_iter()
            .map(|def| ColumnOptions::resolve(def, defaults))
            .collect();
        self.inner
            .columns
            .dispatch(ColumnAction::SetColumns(resolved))?;
        Ok(())
    }

    /// Pin a column to an edge, or unpin it with `None`.
    ///
    /// # Errors
    /// Returns [`GridError::UnknownColumn`] if no column has this field.
    pub fn pin_column(&self, field: &str, pinned: Option<Pinned>) -> Result<()> {
        self.require_column(field)?;
        self.inner.columns.dispatch(ColumnAction::UpdateColumnPinned {
            field: field.to_string(),
            pinned,
        })?;
        Ok(())
    }

    /// Move a column to display index `to`, clamped to the last column.
    ///
    /// # Errors
    /// Returns [`GridError::UnknownColumn`] if no column has this field.
    pub fn move_column(&self, field: &str, to: usize) -> Result<()> {
        self.require_column(field)?;
        self.inner.columns.dispatch(ColumnAction::MoveColumn {
            field: field.to_string(),
            to,
        })?;
        Ok(())
    }

    fn require_column(&self, field: &str) -> Result<Rc<ColumnOptions>> {
        self.get_column_options(field)
            .ok_or_else(|| GridError::UnknownColumn(field.to_string()))
    }

    pub(crate) fn transformer_for(&self, column: &ColumnOptions) -> Option<Rc<dyn Transformer>> {
        let name = column.transformer.as_deref()?;
        let transformer = self.inner.plugins.borrow().transformer(name);
        if transformer.is_none() {
            tracing::warn!(transformer = name, field = %column.field, "transformer not registered");
        }
        transformer
    }

    // Coordinates

    pub fn get_coordinate(&self, row: &str, field: &str) -> Option<Coordinate> {
        Some(Coordinate::new(
            self.inner.columns.column_index(field)?,
            self.inner.rows.row_index(row)?,
        ))
    }

    pub fn get_cell_position(&self, coord: Coordinate) -> Option<CellPosition> {
        let column = self.inner.columns.column_at(coord.x)?;
        let row = self.inner.rows.row_id_by_index(coord.y)?;
        Some(CellPosition::new(row, column.field.clone()))
    }

    /// Last valid coordinate, or `None` for an empty grid.
    pub fn extent(&self) -> Option<Coordinate> {
        let columns = self.inner.columns.state();
        Extent {
            row_count: self.inner.rows.row_count(),
            row_height: self.inner.options.row_height,
            columns: &columns.layout,
        }
        .last_coordinate()
    }

    // Selection

    pub fn get_selection_ranges(&self) -> Vec<SelectionRange> {
        self.inner.selection.ranges()
    }

    /// Replace the selection, clamping every range to the grid. Bypasses
    /// hooks.
    ///
    /// # Errors
    /// Only fails if the selection store lost its reducer.
    pub fn set_selection_ranges(&self, ranges: Vec<SelectionRange>) -> Result<()> {
        let action = match self.extent() {
            Some(extent) if !ranges.is_empty() => SelectionAction::SetRanges {
                ranges: ranges.into_iter().map(|r| r.clamp_to(extent)).collect(),
                active: None,
            },
            _ => SelectionAction::Clear,
        };
        self.inner.selection.dispatch(action)?;
        Ok(())
    }

    /// Move the active cell without touching the ranges. Refused unless a
    /// range covers `coord`.
    pub fn set_active_cell(&self, coord: Coordinate) -> bool {
        let state = self.inner.selection.state();
        if !state.ranges.iter().any(|r| r.contains(coord)) {
            return false;
        }
        if state.active_cell == Some(coord) {
            return true;
        }
        logged(
            self.inner
                .selection
                .dispatch(SelectionAction::SetActiveCell(Some(coord))),
        )
        .is_some()
    }

    pub fn select_all(&self) -> bool {
        let Some(extent) = self.extent() else {
            return false;
        };
        self.change_selection(
            vec![SelectionRange::new(Coordinate::new(0, 0), extent)],
            None,
        )
    }

    // Editing

    /// Ask the cell at (row, field) to start editing. Refused for readonly
    /// columns and columns without a registered editor.
    pub fn start_editing(&self, row: &str, field: &str) -> bool {
        let Some(column) = self.get_column_options(field) else {
            return false;
        };
        if !column.is_editable() || self.inner.rows.row_index(row).is_none() {
            return false;
        }
        let Some(editor) = column.cell_editor.as_deref() else {
            return false;
        };
        if !self.inner.plugins.borrow().has_editor(editor) {
            tracing::warn!(editor, field, "editor not registered");
            return false;
        }
        let position = CellPosition::new(row, field);
        match self.inner.selection.editing() {
            Some(current) if current == position => return true,
            Some(_) => self.stop_editing(),
            None => {}
        }
        if let Some(coord) = self.get_coordinate(row, field) {
            self.scroll_into_view(coord);
        }
        logged(
            self.inner
                .selection
                .dispatch(SelectionAction::StartEditing(position.clone())),
        );
        let started = self
            .inner
            .cells
            .borrow()
            .get(&position)
            .is_some_and(MountedCell::is_editing);
        if !started {
            logged(self.inner.selection.dispatch(SelectionAction::StopEditing));
        }
        started
    }

    /// Commit the cell being edited, if any.
    pub fn stop_editing(&self) {
        if self.inner.selection.editing().is_some() {
            logged(self.inner.selection.dispatch(SelectionAction::StopEditing));
            // The edited cell may have been kept mounted outside the window.
            self.sync_mounts();
        }
    }

    pub fn editing(&self) -> Option<CellPosition> {
        self.inner.selection.editing()
    }

    // Plugins

    pub fn register_renderer<R, F>(&self, name: impl Into<String>, factory: F)
    where
        R: CellRenderer + 'static,
        F: Fn() -> R + 'static,
    {
        self.inner
            .plugins
            .borrow_mut()
            .register_renderer(name, factory);
    }

    pub fn register_editor<E, F>(&self, name: impl Into<String>, factory: F)
    where
        E: CellEditor + 'static,
        F: Fn() -> E + 'static,
    {
        self.inner.plugins.borrow_mut().register_editor(name, factory);
    }

    pub fn register_transformer(
        &self,
        name: impl Into<String>,
        transformer: impl Transformer + 'static,
    ) {
        self.inner
            .plugins
            .borrow_mut()
            .register_transformer(name, transformer);
    }

    pub fn set_clipboard(&self, clipboard: impl Clipboard + 'static) {
        *self.inner.clipboard.borrow_mut() = Box::new(clipboard);
    }

    // Menus

    pub fn set_context_menu_provider(
        &self,
        provider: impl Fn(&Grid, &ContextMenuParams) -> Vec<MenuItem> + 'static,
    ) {
        *self.inner.context_menu.borrow_mut() = Some(Rc::new(provider));
    }

    pub fn set_column_menu_provider(
        &self,
        provider: impl Fn(&Grid, &ColumnMenuParams) -> Vec<MenuItem> + 'static,
    ) {
        *self.inner.column_menu.borrow_mut() = Some(Rc::new(provider));
    }

    /// Items for a right click on (row, field), after the context-menu hooks.
    /// `None` without a provider, for unknown cells, or when a hook cancels.
    pub fn context_menu(&self, row: &str, field: &str) -> Option<Vec<MenuItem>> {
        self.get_coordinate(row, field)?;
        let provider = self.inner.context_menu.borrow().clone()?;
        let items = provider(
            self,
            &ContextMenuParams {
                row: row.to_string(),
                column: field.to_string(),
            },
        );
        let position = CellPosition::new(row, field);
        self.inner.hooks.run(
            &HookEvent::ContextMenuShow {
                position: &position,
                items: &items,
            },
            || (),
        )?;
        Some(items)
    }

    pub fn column_menu(&self, field: &str) -> Option<Vec<MenuItem>> {
        self.get_column_options(field)?;
        let provider = self.inner.column_menu.borrow().clone()?;
        Some(provider(
            self,
            &ColumnMenuParams {
                column: field.to_string(),
            },
        ))
    }

    // Viewport and mounting

    pub fn viewport(&self) -> Viewport {
        self.inner.viewport.get()
    }

    /// Move and resize the viewport, then remount cells for the new window.
    pub fn set_viewport(&self, scroll_x: f32, scroll_y: f32, width: f32, height: f32) {
        let mut viewport = self.inner.viewport.get();
        viewport.resize(width, height);
        self.inner.viewport.set(viewport);
        let container = self.inner.columns.state().container_width;
        if (viewport.width - container).abs() > f32::EPSILON {
            logged(
                self.inner
                    .columns
                    .dispatch(ColumnAction::SetContainerWidth(viewport.width)),
            );
        }
        self.scroll_to(scroll_x, scroll_y);
    }

    /// Size the grid from its container, header included. The body gets the
    /// height left below the header; the scroll position is kept.
    pub fn set_container_size(&self, width: f32, height: f32) {
        let viewport = self.inner.viewport.get();
        let body = (height - self.inner.options.header_height).max(0.0);
        self.set_viewport(viewport.scroll_x, viewport.scroll_y, width, body);
    }

    pub fn scroll_to(&self, scroll_x: f32, scroll_y: f32) {
        let mut viewport = self.inner.viewport.get();
        {
            let columns = self.inner.columns.state();
            let extent = self.layout_extent(&columns);
            viewport.set_scroll(scroll_x, scroll_y, &extent);
        }
        self.inner.viewport.set(viewport);
        self.sync_mounts();
    }

    pub fn scroll_by(&self, delta_x: f32, delta_y: f32) {
        let viewport = self.inner.viewport.get();
        self.scroll_to(viewport.scroll_x + delta_x, viewport.scroll_y + delta_y);
    }

    fn layout_extent<'a>(&self, columns: &'a crate::store::ColumnState) -> Extent<'a> {
        Extent {
            row_count: self.inner.rows.row_count(),
            row_height: self.inner.options.row_height,
            columns: &columns.layout,
        }
    }

    /// Run one scheduler tick. Returns the number of tasks run.
    pub fn tick(&self) -> usize {
        self.inner.scheduler.tick()
    }

    /// Tick until no deferred work is left.
    pub fn flush(&self) -> usize {
        self.inner.scheduler.run_until_idle()
    }

    /// Snapshot of the mounted cell at (row, field).
    pub fn cell(&self, row: &str, field: &str) -> Option<CellSnapshot> {
        self.inner
            .cells
            .borrow()
            .get(&CellPosition::new(row, field))
            .map(MountedCell::snapshot)
    }

    pub fn mounted_cell_count(&self) -> usize {
        self.inner.cells.borrow().len()
    }

    /// Positions of every mounted cell, in no particular order.
    pub fn mounted_cells(&self) -> Vec<CellPosition> {
        self.inner.cells.borrow().keys().cloned().collect()
    }

    /// Rows or columns were added, removed or moved.
    fn structure_changed(&self) {
        self.clamp_selection();
        if let Some(editing) = self.inner.selection.editing() {
            if self.get_coordinate(&editing.row, &editing.column).is_none() {
                logged(self.inner.selection.dispatch(SelectionAction::StopEditing));
            }
        }
        {
            let mut viewport = self.inner.viewport.get();
            let columns = self.inner.columns.state();
            viewport.clamp_scroll(&self.layout_extent(&columns));
            self.inner.viewport.set(viewport);
        }
        self.sync_mounts();
    }

    fn clamp_selection(&self) {
        let state = self.inner.selection.state();
        if state.ranges.is_empty() {
            return;
        }
        let action = match self.extent() {
            Some(extent) => {
                let ranges: Vec<_> = state.ranges.iter().map(|r| r.clamp_to(extent)).collect();
                if ranges == state.ranges {
                    return;
                }
                SelectionAction::SetRanges {
                    ranges,
                    active: state.active_cell.map(|c| c.clamp_to(extent)),
                }
            }
            None => SelectionAction::Clear,
        };
        logged(self.inner.selection.dispatch(action));
    }

    /// Mount cells inside the preload window, unmount the rest, and push
    /// visibility to the cells inside the viewport proper.
    fn sync_mounts(&self) {
        let inner = &self.inner;
        let rows = inner.rows.state();
        let columns = inner.columns.state();
        let viewport = inner.viewport.get();
        let extent = self.layout_extent(&columns);
        let column_window = viewport.visible_columns(&columns.layout);

        let mut desired = HashMap::new();
        if let Some(row_window) = viewport.visible_rows(&extent, inner.options.preload_row_count) {
            for y in row_window {
                let Some(row) = rows.rows.get(y as usize) else {
                    continue;
                };
                for x in column_window.iter() {
                    let (Some(column), Some(width)) = (columns.column_at(x), columns.layout.width(x))
                    else {
                        continue;
                    };
                    desired.insert(
                        CellPosition::new(row.id.clone(), column.field.clone()),
                        (Coordinate::new(x, y), Rc::clone(column), width),
                    );
                }
            }
        }

        let ranges = inner.selection.state().ranges.clone();
        let host: Weak<dyn CellHost> = Weak::<GridInner>::clone(&inner.this);
        let ctx = MountContext {
            host,
            rows: &inner.rows,
            columns: &inner.columns,
            selection: &inner.selection,
            visibility: &inner.visibility,
        };

        let removed: Vec<MountedCell> = {
            let mut cells = inner.cells.borrow_mut();
            let stale: Vec<CellPosition> = cells
                .iter()
                .filter(|(pos, cell)| !desired.contains_key(*pos) && !cell.is_editing())
                .map(|(pos, _)| pos.clone())
                .collect();
            let removed = stale.iter().filter_map(|pos| cells.remove(pos)).collect();

            // Cells kept alive for editing may have lost their row or column.
            let orphans: Vec<CellPosition> = cells
                .keys()
                .filter(|pos| {
                    !desired.contains_key(*pos)
                        && (rows.row_indexes.get(&pos.row).is_none()
                            || columns.column_indexes.get(&pos.column).is_none())
                })
                .cloned()
                .collect();
            let mut removed: Vec<MountedCell> = removed;
            removed.extend(orphans.iter().filter_map(|pos| cells.remove(pos)));

            for (position, (coord, column, width)) in desired {
                match cells.get(&position) {
                    Some(cell) => cell.relocate(coord, column, width, &ranges),
                    None => {
                        let mounted = cell::mount(&ctx, position.clone(), coord, column, width);
                        cells.insert(position, mounted);
                    }
                }
            }
            removed
        };
        if !removed.is_empty() {
            tracing::trace!(unmounted = removed.len(), "cells unmounted");
        }
        drop(removed);
        self.notify_visible();
    }

    /// Deliver visibility to mounted cells inside the viewport (no preload).
    fn notify_visible(&self) {
        let inner = &self.inner;
        let rows = inner.rows.state();
        let columns = inner.columns.state();
        let viewport = inner.viewport.get();
        let extent = self.layout_extent(&columns);
        let Some(row_window) = viewport.visible_rows(&extent, 0) else {
            return;
        };
        let column_window = viewport.visible_columns(&columns.layout);
        let fired = inner.visibility.notify(|pos| {
            let (Some(&y), Some(&x)) = (
                rows.row_indexes.get(&pos.row),
                columns.column_indexes.get(&pos.column),
            ) else {
                return false;
            };
            match (u32::try_from(y), u32::try_from(x)) {
                (Ok(y), Ok(x)) => row_window.contains(&y) && column_window.contains(x),
                _ => false,
            }
        });
        if fired > 0 {
            tracing::trace!(fired, "cells became visible");
        }
    }
}

impl CellHost for GridInner {
    fn raw_value(&self, position: &CellPosition) -> Option<Value> {
        self.rows.raw_cell_value(&position.row, &position.column)
    }

    fn display_value(&self, position: &CellPosition) -> Option<Value> {
        let inner = self.this.upgrade()?;
        Grid { inner }.get_cell_value(&position.row, &position.column)
    }

    fn write_value(&self, position: &CellPosition, value: Value) -> bool {
        self.rows
            .dispatch(RowAction::SetCellValue {
                row: position.row.clone(),
                column: position.column.clone(),
                value,
            })
            .is_ok()
    }

    fn create_renderer(&self, name: &str) -> Option<Box<dyn CellRenderer>> {
        self.plugins.borrow().create_renderer(name)
    }

    fn create_editor(&self, name: &str) -> Option<Box<dyn CellEditor>> {
        self.plugins.borrow().create_editor(name)
    }

    fn schedule(&self, task: Box<dyn FnOnce()>) -> TaskHandle {
        self.scheduler.schedule(task)
    }
}
