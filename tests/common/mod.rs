//! Shared grid builders and plugin doubles for integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};
use vgrid::plugin::{CellEditor, CellRenderer, Element, PluginParams};
use vgrid::{Grid, RowData};

/// `count` rows with ids `r0..` and `name`, `qty`, `done` values.
pub fn rows(count: usize) -> Vec<RowData> {
    (0..count)
        .map(|i| {
            RowData::new(format!("r{i}"))
                .with("name", format!("item {i}"))
                .with("qty", i)
                .with("done", i % 2 == 0)
        })
        .collect()
}

/// A grid with three 200px columns (`name`, `qty`, `done`) and `count`
/// rows, sized so every column fits and ten rows are in view.
pub fn grid_with_rows(count: usize) -> Grid {
    grid_from(
        json!({
            "columns": [{"field": "name"}, {"field": "qty"}, {"field": "done"}],
            "preloadRowCount": 2,
        }),
        count,
    )
}

/// Build a grid from JSON options, append `count` rows and size the
/// viewport to 600x280.
pub fn grid_from(options: Value, count: usize) -> Grid {
    let grid = Grid::from_json(&options.to_string()).unwrap();
    grid.append_rows(rows(count)).unwrap();
    grid.set_viewport(0.0, 0.0, 600.0, 280.0);
    grid.flush();
    grid
}

/// Calls recorded by [`RecordingRenderer`] and [`RecordingEditor`].
#[derive(Debug, Default)]
pub struct PluginLog {
    pub inits: Vec<(String, Value)>,
    pub attached: usize,
}

pub type SharedLog = Rc<RefCell<PluginLog>>;

/// Renders the raw value inside a `<b>` and records every call.
pub struct RecordingRenderer {
    pub log: SharedLog,
    pub value: Value,
}

impl CellRenderer for RecordingRenderer {
    fn init(&mut self, params: PluginParams<'_>) {
        self.value = params.value.clone();
        self.log
            .borrow_mut()
            .inits
            .push((params.position.row.clone(), params.value.clone()));
    }

    fn gui(&self) -> Element {
        Element::new("b").with_text(self.value.to_string())
    }

    fn after_attached(&mut self) {
        self.log.borrow_mut().attached += 1;
    }
}

/// Editor whose committed value is whatever the test puts in `next`.
pub struct ScriptedEditor {
    pub log: SharedLog,
    pub next: Rc<RefCell<Value>>,
    pub popup: bool,
}

impl CellRenderer for ScriptedEditor {
    fn init(&mut self, params: PluginParams<'_>) {
        *self.next.borrow_mut() = params.value.clone();
        self.log
            .borrow_mut()
            .inits
            .push((params.position.row.clone(), params.value.clone()));
    }

    fn gui(&self) -> Element {
        Element::new("input").with_attr("value", self.next.borrow().to_string())
    }
}

impl CellEditor for ScriptedEditor {
    fn is_popup(&self) -> bool {
        self.popup
    }

    fn value(&self) -> Value {
        self.next.borrow().clone()
    }
}
