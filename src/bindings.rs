//! JavaScript bindings.
//!
//! `VGrid` wraps a [`Grid`] for use from the browser. Options and rows come
//! in as plain JS objects; deferred cell work is flushed on a microtask after
//! the first task is queued.

use std::rc::Rc;

use js_sys::{Function, Promise};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};
use web_sys::{Document, KeyboardEvent, MouseEvent};

use crate::cell::CellContent;
use crate::error::{GridError, Result};
use crate::grid::{Clipboard, Grid};
use crate::plugin::Element;
use crate::selection::SelectionRange;
use crate::store::{RowAction, RowActionKind, Subscription};
use crate::types::{
    Coordinate, GridOptions, KeyInput, Modifiers, MouseButton, MouseInput, Pinned, RowData,
};

fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| GridError::Js(e.to_string()).into())
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> std::result::Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| GridError::Js(e.to_string()).into())
}

/// Writes through `navigator.clipboard` and remembers the last text for
/// synchronous reads. Asynchronous paste goes through
/// [`VGrid::paste_from_clipboard`].
#[derive(Debug, Default)]
struct BrowserClipboard {
    last: String,
}

impl Clipboard for BrowserClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let window = web_sys::window().ok_or_else(|| GridError::Clipboard("no window".into()))?;
        let promise = window.navigator().clipboard().write_text(text);
        spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                tracing::warn!(?err, "clipboard write rejected");
            }
        });
        self.last = text.to_string();
        Ok(())
    }

    fn read_text(&mut self) -> Result<String> {
        Ok(self.last.clone())
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

/// Pointer relative to the grid container, header included.
fn mouse_input(event: &MouseEvent) -> MouseInput {
    let button = match event.button() {
        1 => MouseButton::Middle,
        2 => MouseButton::Secondary,
        _ => MouseButton::Primary,
    };
    #[allow(clippy::cast_precision_loss)]
    let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
    MouseInput {
        x,
        y,
        button,
        pressed: event.buttons() & 1 == 1,
        modifiers: modifiers(
            event.shift_key(),
            event.ctrl_key(),
            event.alt_key(),
            event.meta_key(),
        ),
    }
}

fn key_input(event: &KeyboardEvent) -> KeyInput {
    KeyInput::new(event.key()).with_modifiers(modifiers(
        event.shift_key(),
        event.ctrl_key(),
        event.alt_key(),
        event.meta_key(),
    ))
}

/// Build DOM nodes for an element tree.
fn build_dom(document: &Document, element: &Element) -> std::result::Result<web_sys::Element, JsValue> {
    let node = document.create_element(&element.tag)?;
    if !element.classes.is_empty() {
        node.set_class_name(&element.classes.join(" "));
    }
    for (name, value) in &element.attributes {
        node.set_attribute(name, value)?;
    }
    if let Some(text) = &element.text {
        node.set_text_content(Some(text));
    }
    for child in &element.children {
        node.append_child(&build_dom(document, child)?)?;
    }
    Ok(node)
}

#[wasm_bindgen]
pub struct VGrid {
    grid: Grid,
    _value_listener: Option<Subscription>,
}

#[wasm_bindgen]
impl VGrid {
    /// Create a grid from a JS options object (`columns`, `rows`,
    /// `rowHeight`, `fillable`, ...).
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> std::result::Result<VGrid, JsValue> {
        console_error_panic_hook::set_once();

        let options: GridOptions = if options.is_undefined() || options.is_null() {
            GridOptions::default()
        } else {
            from_js(options)?
        };
        let grid = Grid::new(options);
        grid.set_clipboard(BrowserClipboard::default());

        let scheduler = Rc::downgrade(grid.scheduler());
        grid.scheduler().set_wake(move || {
            let scheduler = std::rc::Weak::clone(&scheduler);
            spawn_local(async move {
                if let Some(scheduler) = scheduler.upgrade() {
                    scheduler.run_until_idle();
                }
            });
        });

        Ok(VGrid {
            grid,
            _value_listener: None,
        })
    }

    pub fn append_rows(&self, rows: JsValue) -> std::result::Result<(), JsValue> {
        let rows: Vec<RowData> = from_js(rows)?;
        Ok(self.grid.append_rows(rows)?)
    }

    pub fn remove_rows(&self, ids: Vec<String>) -> std::result::Result<(), JsValue> {
        Ok(self.grid.remove_rows(ids)?)
    }

    pub fn get_cell_value(&self, row: &str, field: &str) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.get_cell_value(row, field))
    }

    pub fn get_raw_cell_value(
        &self,
        row: &str,
        field: &str,
    ) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.get_raw_cell_value(row, field))
    }

    pub fn set_cell_value(
        &self,
        row: &str,
        field: &str,
        value: JsValue,
    ) -> std::result::Result<(), JsValue> {
        let value: serde_json::Value = from_js(value)?;
        Ok(self.grid.set_cell_value(row, field, value)?)
    }

    pub fn get_column_options(&self, field: &str) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.get_column_options(field).as_deref())
    }

    pub fn get_selection_ranges(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.get_selection_ranges())
    }

    pub fn set_selection_ranges(&self, ranges: JsValue) -> std::result::Result<(), JsValue> {
        let ranges: Vec<SelectionRange> = from_js(ranges)?;
        Ok(self.grid.set_selection_ranges(ranges)?)
    }

    pub fn set_active_cell(&self, x: u32, y: u32) -> bool {
        self.grid.set_active_cell(Coordinate::new(x, y))
    }

    /// `pinned` is `"left"`, `"right"` or `null`.
    pub fn pin_column(&self, field: &str, pinned: JsValue) -> std::result::Result<(), JsValue> {
        let pinned: Option<Pinned> = if pinned.is_null() || pinned.is_undefined() {
            None
        } else {
            Some(from_js(pinned)?)
        };
        Ok(self.grid.pin_column(field, pinned)?)
    }

    pub fn move_column(&self, field: &str, to: usize) -> std::result::Result<(), JsValue> {
        Ok(self.grid.move_column(field, to)?)
    }

    pub fn copy_selection(&self) -> std::result::Result<Option<String>, JsValue> {
        Ok(self.grid.copy_selection()?)
    }

    pub fn paste_text(&self, text: &str) -> bool {
        self.grid.paste_text(text).is_some()
    }

    /// Read `navigator.clipboard` and paste at the active cell. Resolves to
    /// whether anything was pasted.
    pub fn paste_from_clipboard(&self) -> std::result::Result<Promise, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let read = window.navigator().clipboard().read_text();
        let grid = self.grid.clone();
        Ok(future_to_promise(async move {
            let text = JsFuture::from(read).await?.as_string().unwrap_or_default();
            Ok(JsValue::from_bool(grid.paste_text(&text).is_some()))
        }))
    }

    pub fn get_coordinate(&self, row: &str, field: &str) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.get_coordinate(row, field))
    }

    pub fn set_viewport(&self, scroll_x: f32, scroll_y: f32, width: f32, height: f32) {
        self.grid.set_viewport(scroll_x, scroll_y, width, height);
    }

    /// Container size in pixels, header included.
    pub fn set_container_size(&self, width: f32, height: f32) {
        self.grid.set_container_size(width, height);
    }

    pub fn resize_column(&self, field: &str, width: f32) -> bool {
        self.grid.resize_column(field, width)
    }

    // Input

    pub fn on_mouse_down(&self, event: &MouseEvent) -> bool {
        self.grid
            .body_input(&mouse_input(event))
            .is_some_and(|mouse| self.grid.mouse_down_at(&mouse))
    }

    pub fn on_mouse_move(&self, event: &MouseEvent) -> bool {
        self.grid
            .body_input(&mouse_input(event))
            .is_some_and(|mouse| self.grid.mouse_move_at(&mouse))
    }

    pub fn on_mouse_up(&self, event: &MouseEvent) {
        self.grid.mouse_up_at(&mouse_input(event));
    }

    pub fn on_double_click(&self, event: &MouseEvent) -> bool {
        self.grid
            .body_input(&mouse_input(event))
            .is_some_and(|mouse| self.grid.double_click_at(&mouse))
    }

    pub fn on_mouse_leave(&self) {
        self.grid.mouse_leave();
    }

    /// Returns `true` if the grid handled the key and the default action
    /// should be prevented.
    pub fn on_key_down(&self, event: &KeyboardEvent) -> bool {
        self.grid.key_down(&key_input(event))
    }

    pub fn on_key_press(&self, event: &KeyboardEvent) -> bool {
        self.grid.key_press(&key_input(event))
    }

    pub fn on_key_up(&self, event: &KeyboardEvent) -> bool {
        self.grid.key_up(&key_input(event))
    }

    // Rendering

    pub fn tick(&self) -> usize {
        self.grid.tick()
    }

    pub fn flush(&self) -> usize {
        self.grid.flush()
    }

    /// Snapshot of a mounted cell, or `undefined` if it is not mounted.
    pub fn cell(&self, row: &str, field: &str) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.grid.cell(row, field))
    }

    /// DOM for a mounted cell's current content.
    pub fn render_cell(
        &self,
        row: &str,
        field: &str,
    ) -> std::result::Result<Option<web_sys::Element>, JsValue> {
        let Some(snapshot) = self.grid.cell(row, field) else {
            return Ok(None);
        };
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let element = match snapshot.content {
            CellContent::Empty => Element::new("span"),
            CellContent::Text { text } => Element::text(text),
            CellContent::Element { element } => element,
            CellContent::Editor { element, popup } => {
                let class = if popup { "vgrid-editor-popup" } else { "vgrid-editor" };
                Element::new("div").with_class(class).with_child(element)
            }
        };
        build_dom(&document, &element).map(Some)
    }

    /// Call `callback(row, field, value)` after every cell value change.
    /// Replaces any previous callback.
    pub fn on_cell_value_changed(&mut self, callback: Function) {
        let subscription =
            self.grid
                .rows()
                .subscribe_scoped(RowActionKind::SetCellValue, move |_, action| {
                    let RowAction::SetCellValue { row, column, value } = action else {
                        return;
                    };
                    let value = to_js(value).unwrap_or(JsValue::NULL);
                    if let Err(err) = callback.call3(
                        &JsValue::NULL,
                        &JsValue::from_str(row),
                        &JsValue::from_str(column),
                        &value,
                    ) {
                        tracing::warn!(?err, "cell value callback threw");
                    }
                });
        self._value_listener = Some(subscription);
    }
}
