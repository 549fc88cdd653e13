//! Browser binding smoke tests. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde::Serialize;
use vgrid::VGrid;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap()
}

fn grid() -> VGrid {
    let options = serde_json::json!({
        "columns": [{"field": "name"}, {"field": "qty", "readonly": true}],
    });
    let grid = VGrid::new(js(&options)).unwrap();
    let rows = serde_json::json!([
        {"id": "a", "name": "Ada", "qty": 1},
        {"id": "b", "name": "Bob", "qty": 2},
    ]);
    grid.append_rows(js(&rows)).unwrap();
    grid.set_viewport(0.0, 0.0, 400.0, 200.0);
    grid.flush();
    grid
}

#[wasm_bindgen_test]
fn rows_round_trip_through_js_values() {
    let grid = grid();
    assert_eq!(grid.get_cell_value("b", "name").unwrap().as_string().as_deref(), Some("Bob"));
    grid.set_cell_value("b", "name", JsValue::from_str("Bea")).unwrap();
    assert_eq!(
        grid.get_raw_cell_value("b", "name").unwrap().as_string().as_deref(),
        Some("Bea")
    );
    grid.remove_rows(vec!["a".into()]).unwrap();
    assert!(grid.get_cell_value("a", "name").unwrap().is_null());
}

#[wasm_bindgen_test]
fn missing_options_use_defaults() {
    let grid = VGrid::new(JsValue::UNDEFINED).unwrap();
    assert!(grid.get_column_options("name").unwrap().is_null());
}

#[wasm_bindgen_test]
fn malformed_options_report_an_interop_error() {
    let err = VGrid::new(js(&serde_json::json!({"rowHeight": "tall"}))).err().unwrap();
    assert!(err.as_string().unwrap().starts_with("JS interop error:"));
}

#[wasm_bindgen_test]
fn unknown_columns_are_rejected() {
    let grid = grid();
    let err = grid.move_column("price", 0).unwrap_err();
    assert_eq!(err.as_string().as_deref(), Some("Unknown column: price"));
    grid.pin_column("qty", JsValue::from_str("left")).unwrap();
    grid.move_column("name", 1).unwrap();
}

#[wasm_bindgen_test]
fn paste_text_respects_readonly_columns() {
    let grid = grid();
    let ranges = serde_json::json!([{"anchor": {"x": 0, "y": 0}, "focus": {"x": 0, "y": 0}}]);
    grid.set_selection_ranges(js(&ranges)).unwrap();
    assert!(grid.paste_text("Zed\t9"));
    assert_eq!(
        grid.get_raw_cell_value("a", "name").unwrap().as_string().as_deref(),
        Some("Zed")
    );
    assert_eq!(grid.get_raw_cell_value("a", "qty").unwrap().as_f64(), Some(1.0));
}

#[wasm_bindgen_test]
fn render_cell_builds_dom() {
    let grid = grid();
    let node = grid.render_cell("a", "name").unwrap().expect("mounted");
    assert_eq!(node.text_content().as_deref(), Some("Ada"));
    assert!(grid.render_cell("zz", "name").unwrap().is_none());
}
