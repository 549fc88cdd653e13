//! Mounted cells: bind one (row, column) to its rendered output.
//!
//! A cell moves between three modes:
//! - `Idle`: shows the column renderer's element, or the transformed value as
//!   plain text when the column has no renderer
//! - `Selected`: some active range contains the cell; boundary flags say
//!   which outer edges of the selection it sits on
//! - `Editing`: the column editor replaced the content, seeded with the raw
//!   value; stopping writes the editor's value back through the row store
//!
//! Cells subscribe to the stores directly and only react to actions that
//! concern them. The first render waits until the cell becomes visible and
//! runs on the scheduler; everything a cell holds is released when its
//! [`MountedCell`] is dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;
use serde_json::Value;

use crate::plugin::{display_text, CellEditor, CellRenderer, Element, PluginParams};
use crate::scheduler::{Observation, TaskHandle, VisibilityObserver};
use crate::selection::{CellSelection, SelectionRange};
use crate::store::{
    ColumnAction, ColumnActionKind, ColumnStore, RowAction, RowActionKind, RowStore,
    SelectionAction, SelectionActionKind, SelectionStore, Subscription, ROW_NUMBER_FIELD,
};
use crate::types::{CellPosition, ColumnOptions, Coordinate};

/// What a cell needs from the grid that owns it.
pub(crate) trait CellHost {
    fn raw_value(&self, position: &CellPosition) -> Option<Value>;
    fn display_value(&self, position: &CellPosition) -> Option<Value>;
    /// Store an edited value. Returns `false` if nothing was dispatched.
    fn write_value(&self, position: &CellPosition, value: Value) -> bool;
    fn create_renderer(&self, name: &str) -> Option<Box<dyn CellRenderer>>;
    fn create_editor(&self, name: &str) -> Option<Box<dyn CellEditor>>;
    fn schedule(&self, task: Box<dyn FnOnce()>) -> TaskHandle;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellMode {
    Idle,
    Selected,
    Editing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CellContent {
    /// Not rendered yet, or the row is gone.
    Empty,
    Text { text: String },
    Element { element: Element },
    Editor { element: Element, popup: bool },
}

/// Read-only view of a mounted cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSnapshot {
    pub position: CellPosition,
    pub coordinate: Coordinate,
    pub width: f32,
    pub mode: CellMode,
    pub selection: CellSelection,
    pub content: CellContent,
    pub render_count: u32,
}

struct CellView {
    position: CellPosition,
    coord: Coordinate,
    column: Rc<ColumnOptions>,
    width: f32,
    selection: CellSelection,
    renderer: Option<Box<dyn CellRenderer>>,
    editor: Option<Box<dyn CellEditor>>,
    editing: bool,
    content: CellContent,
    render_count: u32,
    pending_render: Option<TaskHandle>,
}

impl CellView {
    fn mode(&self) -> CellMode {
        if self.editing {
            CellMode::Editing
        } else if self.selection.selected {
            CellMode::Selected
        } else {
            CellMode::Idle
        }
    }
}

type View = Rc<RefCell<CellView>>;
type Host = Weak<dyn CellHost>;

/// Stores and observer a cell registers with while mounted.
pub(crate) struct MountContext<'a> {
    pub host: Host,
    pub rows: &'a RowStore,
    pub columns: &'a ColumnStore,
    pub selection: &'a SelectionStore,
    pub visibility: &'a Rc<VisibilityObserver<CellPosition>>,
}

/// A cell attached to the grid. Dropping it unmounts the cell.
pub(crate) struct MountedCell {
    view: View,
    host: Host,
    _subscriptions: Vec<Subscription>,
    _observation: Observation,
}

impl fmt::Debug for MountedCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MountedCell")
            .field(&self.view.borrow().position)
            .finish()
    }
}

pub(crate) fn mount(
    ctx: &MountContext<'_>,
    position: CellPosition,
    coord: Coordinate,
    column: Rc<ColumnOptions>,
    width: f32,
) -> MountedCell {
    let selection = CellSelection::evaluate(&ctx.selection.state().ranges, coord);
    let view: View = Rc::new(RefCell::new(CellView {
        position: position.clone(),
        coord,
        column,
        width,
        selection,
        renderer: None,
        editor: None,
        editing: false,
        content: CellContent::Empty,
        render_count: 0,
        pending_render: None,
    }));

    let mut subscriptions = Vec::with_capacity(8);

    for kind in [SelectionActionKind::SetRanges, SelectionActionKind::Clear] {
        let (weak, host) = (Rc::downgrade(&view), ctx.host.clone());
        subscriptions.push(ctx.selection.subscribe_scoped(kind, move |state, action| {
            let Some(view) = weak.upgrade() else { return };
            if matches!(action, SelectionAction::Clear) {
                stop_editing(&view, &host);
            }
            refresh_selection(&view, &state.ranges);
        }));
    }

    {
        let (weak, host) = (Rc::downgrade(&view), ctx.host.clone());
        subscriptions.push(ctx.selection.subscribe_scoped(
            SelectionActionKind::StartEditing,
            move |_, action| {
                let (Some(view), SelectionAction::StartEditing(target)) = (weak.upgrade(), action)
                else {
                    return;
                };
                if view.borrow().position == *target {
                    start_editing(&view, &host);
                }
            },
        ));
    }
    {
        let (weak, host) = (Rc::downgrade(&view), ctx.host.clone());
        subscriptions.push(ctx.selection.subscribe_scoped(
            SelectionActionKind::StopEditing,
            move |_, _| {
                if let Some(view) = weak.upgrade() {
                    stop_editing(&view, &host);
                }
            },
        ));
    }

    {
        let (weak, host) = (Rc::downgrade(&view), ctx.host.clone());
        subscriptions.push(ctx.rows.subscribe_scoped(
            RowActionKind::SetCellValue,
            move |_, action| {
                let (Some(view), RowAction::SetCellValue { row, column, .. }) =
                    (weak.upgrade(), action)
                else {
                    return;
                };
                let affected = {
                    let v = view.borrow();
                    v.position.row == *row && v.position.column == *column
                };
                if affected {
                    request_render(&view, &host);
                }
            },
        ));
    }
    {
        let (weak, host) = (Rc::downgrade(&view), ctx.host.clone());
        subscriptions.push(ctx.rows.subscribe_scoped(
            RowActionKind::AppendRows,
            move |_, action| {
                let (Some(view), RowAction::AppendRows(rows)) = (weak.upgrade(), action) else {
                    return;
                };
                let affected = {
                    let v = view.borrow();
                    rows.iter().any(|r| r.id == v.position.row)
                };
                if affected {
                    request_render(&view, &host);
                }
            },
        ));
    }

    for kind in [
        ColumnActionKind::UpdateColumnWidth,
        ColumnActionKind::SetContainerWidth,
    ] {
        let weak = Rc::downgrade(&view);
        subscriptions.push(ctx.columns.subscribe_scoped(kind, move |state, action| {
            let Some(view) = weak.upgrade() else { return };
            let width = {
                let v = view.borrow();
                let own_field = matches!(
                    action,
                    ColumnAction::UpdateColumnWidth { field, .. } if *field == v.column.field
                );
                if !own_field && v.column.flex.is_none() {
                    return;
                }
                state.column_width(&v.column.field)
            };
            if let Some(width) = width {
                view.borrow_mut().width = width;
            }
        }));
    }

    let observation = {
        let (weak, host) = (Rc::downgrade(&view), ctx.host.clone());
        ctx.visibility.observe(position, move || {
            if let (Some(view), Some(host)) = (weak.upgrade(), host.upgrade()) {
                render_now(&view, host.as_ref());
            }
        })
    };

    MountedCell {
        view,
        host: ctx.host.clone(),
        _subscriptions: subscriptions,
        _observation: observation,
    }
}

impl MountedCell {
    pub(crate) fn snapshot(&self) -> CellSnapshot {
        let v = self.view.borrow();
        CellSnapshot {
            position: v.position.clone(),
            coordinate: v.coord,
            width: v.width,
            mode: v.mode(),
            selection: v.selection,
            content: v.content.clone(),
            render_count: v.render_count,
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.view.borrow().editing
    }

    /// Update placement after rows or columns moved. Re-renders if the
    /// column's plugin bindings changed.
    pub(crate) fn relocate(
        &self,
        coord: Coordinate,
        column: Rc<ColumnOptions>,
        width: f32,
        ranges: &[SelectionRange],
    ) {
        let rerender = {
            let mut v = self.view.borrow_mut();
            let rebinds = v.column.cell_render != column.cell_render
                || v.column.transformer != column.transformer
                || v.column.cell_params != column.cell_params;
            let renumbered = column.field == ROW_NUMBER_FIELD && v.coord.y != coord.y;
            if v.column.cell_render != column.cell_render {
                v.renderer = None;
            }
            if v.column.cell_editor != column.cell_editor {
                v.editor = None;
            }
            v.coord = coord;
            v.column = column;
            v.width = width;
            v.selection = CellSelection::evaluate(ranges, coord);
            (rebinds || renumbered) && v.render_count > 0
        };
        if rerender {
            request_render(&self.view, &self.host);
        }
    }
}

impl Drop for MountedCell {
    fn drop(&mut self) {
        if let Ok(mut v) = self.view.try_borrow_mut() {
            v.pending_render = None;
        }
    }
}

/// Queue a render for the next tick. A newer request replaces (and cancels)
/// an older one that has not run yet.
fn request_render(view: &View, host: &Host) {
    let Some(strong) = host.upgrade() else { return };
    let (weak_view, weak_host) = (Rc::downgrade(view), host.clone());
    let handle = strong.schedule(Box::new(move || {
        if let (Some(view), Some(host)) = (weak_view.upgrade(), weak_host.upgrade()) {
            render_now(&view, host.as_ref());
        }
    }));
    view.borrow_mut().pending_render = Some(handle);
}

fn render_now(view: &View, host: &dyn CellHost) {
    let mut guard = view.borrow_mut();
    let v = &mut *guard;
    v.pending_render = None;
    if v.editing {
        return;
    }

    let mut rendered = None;
    if let Some(name) = v.column.cell_render.as_deref() {
        if v.renderer.is_none() {
            v.renderer = host.create_renderer(name);
            if v.renderer.is_none() {
                tracing::warn!(renderer = name, field = %v.column.field, "renderer not registered");
            }
        }
        if let Some(renderer) = v.renderer.as_mut() {
            let raw = host.raw_value(&v.position).unwrap_or(Value::Null);
            renderer.init(PluginParams {
                position: &v.position,
                column: &v.column,
                params: &v.column.cell_params,
                value: &raw,
            });
            rendered = Some(renderer.gui());
        }
    }

    v.content = match rendered {
        Some(element) => CellContent::Element { element },
        None => match host.display_value(&v.position) {
            Some(value) => CellContent::Text {
                text: display_text(&value),
            },
            None => CellContent::Empty,
        },
    };
    v.render_count += 1;
    if let (CellContent::Element { .. }, Some(renderer)) = (&v.content, v.renderer.as_mut()) {
        renderer.after_attached();
    }
}

fn refresh_selection(view: &View, ranges: &[SelectionRange]) {
    let mut v = view.borrow_mut();
    let next = CellSelection::evaluate(ranges, v.coord);
    if v.selection != next {
        v.selection = next;
    }
}

fn start_editing(view: &View, host: &Host) {
    let Some(host) = host.upgrade() else { return };
    let mut guard = view.borrow_mut();
    let v = &mut *guard;
    if v.editing || v.column.readonly {
        return;
    }
    let Some(name) = v.column.cell_editor.as_deref() else {
        return;
    };
    if v.editor.is_none() {
        v.editor = host.create_editor(name);
    }
    let Some(editor) = v.editor.as_mut() else {
        tracing::warn!(editor = name, field = %v.column.field, "editor not registered");
        return;
    };

    let raw = host.raw_value(&v.position).unwrap_or(Value::Null);
    editor.init(PluginParams {
        position: &v.position,
        column: &v.column,
        params: &v.column.cell_params,
        value: &raw,
    });
    v.content = CellContent::Editor {
        element: editor.gui(),
        popup: editor.is_popup(),
    };
    editor.after_attached();
    v.editing = true;
    v.pending_render = None;
    tracing::debug!(row = %v.position.row, column = %v.position.column, "editing started");
}

fn stop_editing(view: &View, host: &Host) {
    let (position, value) = {
        let mut v = view.borrow_mut();
        if !v.editing {
            return;
        }
        v.editing = false;
        let value = v.editor.as_ref().map(|e| e.value());
        (v.position.clone(), value)
    };
    tracing::debug!(row = %position.row, column = %position.column, "editing stopped");
    let written = match (value, host.upgrade()) {
        (Some(value), Some(h)) => h.write_value(&position, value),
        _ => false,
    };
    // A successful write re-renders through the row store subscription.
    if !written {
        request_render(view, host);
    }
}
