//! Mouse and keyboard handling.
//!
//! Cell-level entry points take a [`CellPosition`]; the `*_at` variants
//! hit-test body-relative pixels through the viewport first. Every gesture
//! runs inside its before/after hooks.

use serde_json::Value;

use super::events::HookEvent;
use super::{logged, Grid};
use crate::selection::{CellRange, FillRange, SelectionRange};
use crate::store::{ColumnAction, RowAction, SelectionAction};
use crate::types::{CellPosition, Coordinate, KeyInput, MouseButton, MouseInput};

/// Distance in pixels from the active range's bottom-right corner that still
/// counts as grabbing the fill handle.
pub const FILL_HANDLE_SIZE: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum DragState {
    #[default]
    Idle,
    Selecting,
    Filling {
        source: CellRange,
    },
}

impl Grid {
    /// Replace the selection through the selection-change hooks. Without an
    /// explicit `active` cell the last range's anchor becomes active. Returns
    /// `false` if nothing changed or a hook cancelled.
    pub(crate) fn change_selection(
        &self,
        ranges: Vec<SelectionRange>,
        active: Option<Coordinate>,
    ) -> bool {
        let state = self.inner.selection.state();
        let Some(last) = ranges.last().copied() else {
            if state.ranges.is_empty() {
                return false;
            }
            return logged(self.inner.selection.dispatch(SelectionAction::Clear)).is_some();
        };
        let active = active.or(Some(last.anchor()));
        if state.ranges == ranges && state.active_cell == active {
            return false;
        }
        let event = HookEvent::SelectionChange {
            start: last.anchor(),
            end: last.focus(),
        };
        self.inner
            .hooks
            .run(&event, || {
                logged(
                    self.inner
                        .selection
                        .dispatch(SelectionAction::SetRanges { ranges, active }),
                )
            })
            .flatten()
            .is_some()
    }

    /// Logical coordinate under a body-relative pixel position.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<Coordinate> {
        let columns = self.inner.columns.state();
        let extent = self.layout_extent(&columns);
        self.inner.viewport.get().hit_test(x, y, &extent)
    }

    /// Whether (x, y) grabs the fill handle of the active range.
    pub fn fill_handle_at(&self, x: f32, y: f32) -> bool {
        if self.inner.options.fillable.is_none() {
            return false;
        }
        let state = self.inner.selection.state();
        let Some(range) = state.active_range() else {
            return false;
        };
        let columns = self.inner.columns.state();
        let extent = self.layout_extent(&columns);
        let Some((cx, cy, w, h)) = self
            .inner
            .viewport
            .get()
            .cell_rect(range.range().end(), &extent)
        else {
            return false;
        };
        (x - (cx + w)).abs() <= FILL_HANDLE_SIZE && (y - (cy + h)).abs() <= FILL_HANDLE_SIZE
    }

    // Cell-level gestures

    /// Press on a cell. Primary starts a selection drag; Ctrl/Meta adds a
    /// range, Shift extends the active one. A secondary press keeps a
    /// selection that already covers the cell.
    pub fn cell_mouse_down(&self, position: &CellPosition, mouse: &MouseInput) -> bool {
        let Some(coord) = self.get_coordinate(&position.row, &position.column) else {
            return false;
        };
        if self.inner.selection.editing().as_ref() == Some(position) {
            return false;
        }
        let event = HookEvent::CellMouseDown { position, mouse };
        self.inner
            .hooks
            .run(&event, || {
                self.stop_editing();
                let mut ranges = self.inner.selection.ranges();
                match mouse.button {
                    MouseButton::Secondary if ranges.iter().any(|r| r.contains(coord)) => {
                        return;
                    }
                    MouseButton::Primary if mouse.modifiers.shift && !ranges.is_empty() => {
                        if let Some(last) = ranges.last_mut() {
                            *last = last.extend_to(coord);
                        }
                        let active = self.inner.selection.active_cell();
                        self.change_selection(ranges, active);
                    }
                    MouseButton::Primary if mouse.modifiers.command() => {
                        ranges.push(SelectionRange::single(coord));
                        self.change_selection(ranges, Some(coord));
                    }
                    _ => {
                        self.change_selection(vec![SelectionRange::single(coord)], Some(coord));
                    }
                }
                if mouse.button == MouseButton::Primary {
                    self.inner.drag.set(DragState::Selecting);
                }
            })
            .is_some()
    }

    /// Pointer over a cell: track the hovered row and continue any drag.
    pub fn cell_mouse_move(&self, position: &CellPosition, mouse: &MouseInput) -> bool {
        let Some(coord) = self.get_coordinate(&position.row, &position.column) else {
            return false;
        };
        let event = HookEvent::CellMouseMove { position, mouse };
        self.inner
            .hooks
            .run(&event, || {
                if self.inner.rows.state().hovered_row.as_deref() != Some(position.row.as_str()) {
                    logged(
                        self.inner
                            .rows
                            .dispatch(RowAction::SetHoveredRow(Some(position.row.clone()))),
                    );
                }
                match self.inner.drag.get() {
                    DragState::Selecting if mouse.pressed => self.extend_selection_to(coord),
                    DragState::Filling { source } => self.preview_fill(source, coord),
                    _ => {}
                }
            })
            .is_some()
    }

    /// Press on the fill handle of the active range.
    pub fn filler_mouse_down(&self, position: &CellPosition, mouse: &MouseInput) -> bool {
        if self.inner.options.fillable.is_none() {
            return false;
        }
        let state = self.inner.selection.state();
        let Some(source) = state.active_range().map(SelectionRange::range) else {
            return false;
        };
        let event = HookEvent::FillerMouseDown { position, mouse };
        self.inner
            .hooks
            .run(&event, || {
                self.inner.drag.set(DragState::Filling { source });
            })
            .is_some()
    }

    /// End the current drag. A fill drag applies its preview.
    pub fn mouse_up(&self) {
        match self.inner.drag.replace(DragState::Idle) {
            DragState::Filling { .. } => {
                let fill = self.inner.selection.state().fill;
                logged(self.inner.selection.dispatch(SelectionAction::SetFill(None)));
                if let Some(fill) = fill {
                    self.apply_fill(&fill);
                }
            }
            DragState::Selecting | DragState::Idle => {}
        }
    }

    pub fn mouse_leave(&self) {
        if self.inner.rows.state().hovered_row.is_some() {
            logged(self.inner.rows.dispatch(RowAction::SetHoveredRow(None)));
        }
    }

    pub fn cell_double_click(&self, position: &CellPosition, mouse: &MouseInput) -> bool {
        let event = HookEvent::CellDoubleClick { position, mouse };
        self.inner
            .hooks
            .run(&event, || self.start_editing(&position.row, &position.column))
            .unwrap_or(false)
    }

    fn extend_selection_to(&self, coord: Coordinate) {
        let mut ranges = self.inner.selection.ranges();
        let Some(last) = ranges.last_mut() else {
            return;
        };
        if last.focus() == coord {
            return;
        }
        *last = last.extend_to(coord);
        let active = self.inner.selection.active_cell();
        self.change_selection(ranges, active);
    }

    fn preview_fill(&self, source: CellRange, pointer: Coordinate) {
        let (Some(extent), Some(fillable)) = (self.extent(), self.inner.options.fillable) else {
            return;
        };
        let fill = FillRange::compute(source, pointer, extent, fillable);
        if self.inner.selection.state().fill != fill {
            logged(self.inner.selection.dispatch(SelectionAction::SetFill(fill)));
        }
    }

    /// Repeat the source values across the extension, then select the whole
    /// filled range.
    fn apply_fill(&self, fill: &FillRange) -> bool {
        self.inner
            .hooks
            .run(&HookEvent::Filling(fill), || {
                let mut written = 0usize;
                for target in fill.extension().cells() {
                    if self.fill_cell(fill.source_for(target), target) {
                        written += 1;
                    }
                }
                tracing::debug!(written, direction = ?fill.direction(), "filled");
                let selection = fill.selection();
                let active = self
                    .inner
                    .selection
                    .active_cell()
                    .filter(|cell| fill.source().contains(*cell))
                    .unwrap_or_else(|| selection.anchor());
                self.change_selection(vec![selection], Some(active));
            })
            .is_some()
    }

    fn fill_cell(&self, from: Coordinate, to: Coordinate) -> bool {
        let (Some(source), Some(target)) = (self.get_cell_position(from), self.get_cell_position(to))
        else {
            return false;
        };
        let Some(column) = self.get_column_options(&target.column) else {
            return false;
        };
        if !column.accepts_writes() {
            return false;
        }
        let value = self
            .get_raw_cell_value(&source.row, &source.column)
            .unwrap_or(Value::Null);
        self.set_cell_value(&target.row, &target.column, value)
            .is_ok()
    }

    // Pixel entry points

    pub fn mouse_down_at(&self, mouse: &MouseInput) -> bool {
        if mouse.button == MouseButton::Primary && self.fill_handle_at(mouse.x, mouse.y) {
            let corner = self
                .inner
                .selection
                .state()
                .active_range()
                .map(|r| r.range().end());
            if let Some(position) = corner.and_then(|c| self.get_cell_position(c)) {
                return self.filler_mouse_down(&position, mouse);
            }
        }
        self.position_at(mouse)
            .is_some_and(|position| self.cell_mouse_down(&position, mouse))
    }

    pub fn mouse_move_at(&self, mouse: &MouseInput) -> bool {
        self.position_at(mouse)
            .is_some_and(|position| self.cell_mouse_move(&position, mouse))
    }

    pub fn mouse_up_at(&self, _mouse: &MouseInput) {
        self.mouse_up();
    }

    pub fn double_click_at(&self, mouse: &MouseInput) -> bool {
        self.position_at(mouse)
            .is_some_and(|position| self.cell_double_click(&position, mouse))
    }

    /// Translate a container-relative pointer into body space. Pointers over
    /// the header give `None`.
    pub fn body_input(&self, mouse: &MouseInput) -> Option<MouseInput> {
        let header = self.inner.options.header_height;
        (mouse.y >= header).then(|| MouseInput {
            y: mouse.y - header,
            ..*mouse
        })
    }

    fn position_at(&self, mouse: &MouseInput) -> Option<CellPosition> {
        self.get_cell_position(self.hit_test(mouse.x, mouse.y)?)
    }

    // Columns

    /// Resize a column through the column-resizing hooks. Clears its flex so
    /// the new width sticks. Refused for non-resizable columns.
    pub fn resize_column(&self, field: &str, width: f32) -> bool {
        let Some(column) = self.get_column_options(field) else {
            return false;
        };
        if !column.resizable || !width.is_finite() {
            return false;
        }
        let event = HookEvent::ColumnResizing {
            column: field,
            width,
        };
        self.inner
            .hooks
            .run(&event, || {
                logged(self.inner.columns.dispatch(ColumnAction::UpdateColumnWidth {
                    field: field.to_string(),
                    width: Some(width),
                    flex: Some(0.0),
                }))
            })
            .flatten()
            .is_some()
    }

    // Keyboard

    /// Handle a key press. Returns `true` if the grid consumed the key.
    pub fn key_down(&self, key: &KeyInput) -> bool {
        self.inner
            .hooks
            .run(&HookEvent::KeyDown(key), || self.handle_key(key))
            .unwrap_or(false)
    }

    pub fn key_press(&self, key: &KeyInput) -> bool {
        self.inner
            .hooks
            .run(&HookEvent::KeyPress(key), || ())
            .is_some()
    }

    pub fn key_up(&self, key: &KeyInput) -> bool {
        self.inner.hooks.run(&HookEvent::KeyUp(key), || ()).is_some()
    }

    fn handle_key(&self, key: &KeyInput) -> bool {
        let shift = key.modifiers.shift;
        if self.inner.selection.editing().is_some() {
            return match key.key.as_str() {
                "Enter" | "Escape" => {
                    self.stop_editing();
                    true
                }
                "Tab" => {
                    self.stop_editing();
                    self.move_active(if shift { -1 } else { 1 }, 0)
                }
                // Everything else belongs to the editor.
                _ => false,
            };
        }

        if key.modifiers.command() {
            return match key.key.to_ascii_lowercase().as_str() {
                "a" => self.select_all(),
                "c" => {
                    if let Err(err) = self.copy_selection() {
                        tracing::warn!(%err, "copy failed");
                    }
                    true
                }
                "v" => {
                    if let Err(err) = self.paste_from_clipboard() {
                        tracing::warn!(%err, "paste failed");
                    }
                    true
                }
                _ => false,
            };
        }

        let (dx, dy) = match key.key.as_str() {
            "ArrowUp" => (0, -1),
            "ArrowDown" => (0, 1),
            "ArrowLeft" => (-1, 0),
            "ArrowRight" => (1, 0),
            "Tab" => return self.move_active(if shift { -1 } else { 1 }, 0),
            "Enter" => {
                let Some(position) = self
                    .inner
                    .selection
                    .active_cell()
                    .and_then(|c| self.get_cell_position(c))
                else {
                    return false;
                };
                return self.start_editing(&position.row, &position.column);
            }
            _ => return false,
        };
        if shift {
            self.extend_active(dx, dy)
        } else {
            self.move_active(dx, dy)
        }
    }

    /// Move the active cell and collapse the selection onto it.
    fn move_active(&self, dx: i64, dy: i64) -> bool {
        let (Some(extent), Some(active)) = (self.extent(), self.inner.selection.active_cell())
        else {
            return false;
        };
        let next = active.offset(dx, dy).clamp_to(extent);
        let changed = self.change_selection(vec![SelectionRange::single(next)], Some(next));
        self.scroll_into_view(next);
        changed
    }

    /// Grow or shrink the active range from its free corner.
    fn extend_active(&self, dx: i64, dy: i64) -> bool {
        let Some(extent) = self.extent() else {
            return false;
        };
        let mut ranges = self.inner.selection.ranges();
        let Some(last) = ranges.last_mut() else {
            return false;
        };
        let focus = last.focus().offset(dx, dy).clamp_to(extent);
        *last = last.extend_to(focus);
        let active = self.inner.selection.active_cell();
        let changed = self.change_selection(ranges, active);
        self.scroll_into_view(focus);
        changed
    }

    /// Scroll the least distance that brings `coord` fully into view.
    pub fn scroll_into_view(&self, coord: Coordinate) {
        let viewport = self.inner.viewport.get();
        let (dx, dy) = {
            let columns = self.inner.columns.state();
            let extent = self.layout_extent(&columns);
            let Some((x, y, w, h)) = viewport.cell_rect(coord, &extent) else {
                return;
            };
            let layout = &columns.layout;
            let dy = if y < 0.0 {
                y
            } else if y + h > viewport.height {
                y + h - viewport.height
            } else {
                0.0
            };
            let dx = if !layout.center_range().contains(&coord.x) {
                0.0
            } else if x < layout.left_width() {
                x - layout.left_width()
            } else if x + w > viewport.width - layout.right_width() {
                x + w - (viewport.width - layout.right_width())
            } else {
                0.0
            };
            (dx, dy)
        };
        if dx.abs() > f32::EPSILON || dy.abs() > f32::EPSILON {
            self.scroll_by(dx, dy);
        }
    }
}
