//! Row data store.

use std::collections::{HashMap, HashSet};
use std::ops::Deref;
use std::rc::Rc;

use serde_json::Value;

use super::{Action, Store};
use crate::types::RowData;

/// Synthetic field that resolves to the 1-based row number.
pub const ROW_NUMBER_FIELD: &str = "#";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowState {
    /// Rows in display order.
    pub rows: Vec<Rc<RowData>>,
    /// Row id to position in `rows`.
    pub row_indexes: Rc<HashMap<String, usize>>,
    pub hovered_row: Option<String>,
    pub selected_rows: Rc<Vec<String>>,
}

impl RowState {
    pub fn row(&self, id: &str) -> Option<&Rc<RowData>> {
        self.row_indexes.get(id).and_then(|&i| self.rows.get(i))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    SetCellValue {
        row: String,
        column: String,
        value: Value,
    },
    SetHoveredRow(Option<String>),
    SelectRows(Vec<String>),
    AppendRows(Vec<RowData>),
    TakeRows(Vec<String>),
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowActionKind {
    SetCellValue,
    SetHoveredRow,
    SelectRows,
    AppendRows,
    TakeRows,
    Clear,
}

impl RowActionKind {
    pub const ALL: [Self; 6] = [
        Self::SetCellValue,
        Self::SetHoveredRow,
        Self::SelectRows,
        Self::AppendRows,
        Self::TakeRows,
        Self::Clear,
    ];
}

impl Action for RowAction {
    type Kind = RowActionKind;

    fn kind(&self) -> RowActionKind {
        match self {
            Self::SetCellValue { .. } => RowActionKind::SetCellValue,
            Self::SetHoveredRow(_) => RowActionKind::SetHoveredRow,
            Self::SelectRows(_) => RowActionKind::SelectRows,
            Self::AppendRows(_) => RowActionKind::AppendRows,
            Self::TakeRows(_) => RowActionKind::TakeRows,
            Self::Clear => RowActionKind::Clear,
        }
    }
}

/// Store of grid rows keyed by row id.
#[derive(Clone)]
pub struct RowStore {
    store: Store<RowState, RowAction>,
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RowStore {
    pub fn new() -> Self {
        let store = Store::new(RowActionKind::ALL, RowState::default());
        store.handle(RowActionKind::SetCellValue, set_cell_value);
        store.handle(RowActionKind::SetHoveredRow, |state, action| match action {
            RowAction::SetHoveredRow(id) => {
                let known = id.as_ref().map_or(true, |id| state.row_indexes.contains_key(id));
                if !known || state.hovered_row == *id {
                    return Rc::clone(state);
                }
                Rc::new(RowState {
                    hovered_row: id.clone(),
                    ..(**state).clone()
                })
            }
            _ => Rc::clone(state),
        });
        store.handle(RowActionKind::SelectRows, |state, action| match action {
            RowAction::SelectRows(ids) => {
                let selected: Vec<String> = ids
                    .iter()
                    .filter(|id| state.row_indexes.contains_key(*id))
                    .cloned()
                    .collect();
                if *state.selected_rows == selected {
                    return Rc::clone(state);
                }
                Rc::new(RowState {
                    selected_rows: Rc::new(selected),
                    ..(**state).clone()
                })
            }
            _ => Rc::clone(state),
        });
        store.handle(RowActionKind::AppendRows, append_rows);
        store.handle(RowActionKind::TakeRows, take_rows);
        store.handle(RowActionKind::Clear, |state, _| {
            if state.rows.is_empty() && state.hovered_row.is_none() && state.selected_rows.is_empty()
            {
                return Rc::clone(state);
            }
            Rc::new(RowState::default())
        });
        Self { store }
    }

    pub fn row_count(&self) -> usize {
        self.state().rows.len()
    }

    pub fn row_id_by_index(&self, index: u32) -> Option<String> {
        self.state()
            .rows
            .get(index as usize)
            .map(|row| row.id.clone())
    }

    pub fn row_index(&self, id: &str) -> Option<u32> {
        self.state()
            .row_indexes
            .get(id)
            .and_then(|&i| u32::try_from(i).ok())
    }

    /// Stored value of one cell, before any transformer runs.
    ///
    /// [`ROW_NUMBER_FIELD`] yields the 1-based row number.
    pub fn raw_cell_value(&self, row: &str, column: &str) -> Option<Value> {
        let state = self.state();
        let index = *state.row_indexes.get(row)?;
        if column == ROW_NUMBER_FIELD {
            return Some(Value::from(index + 1));
        }
        state.rows.get(index)?.get(column)
    }
}

impl Deref for RowStore {
    type Target = Store<RowState, RowAction>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

fn set_cell_value(state: &Rc<RowState>, action: &RowAction) -> Rc<RowState> {
    let RowAction::SetCellValue { row, column, value } = action else {
        return Rc::clone(state);
    };
    let Some(&index) = state.row_indexes.get(row) else {
        tracing::trace!(row = %row, "set_cell_value on unknown row");
        return Rc::clone(state);
    };
    if column == "id" || column == ROW_NUMBER_FIELD {
        tracing::warn!(column = %column, "refusing to overwrite a synthetic field");
        return Rc::clone(state);
    }
    let Some(current) = state.rows.get(index) else {
        return Rc::clone(state);
    };

    let mut updated = RowData::clone(current);
    updated.set(column, value.clone());
    let mut rows = state.rows.clone();
    if let Some(slot) = rows.get_mut(index) {
        *slot = Rc::new(updated);
    }
    Rc::new(RowState {
        rows,
        row_indexes: Rc::clone(&state.row_indexes),
        hovered_row: state.hovered_row.clone(),
        selected_rows: Rc::clone(&state.selected_rows),
    })
}

fn append_rows(state: &Rc<RowState>, action: &RowAction) -> Rc<RowState> {
    let RowAction::AppendRows(incoming) = action else {
        return Rc::clone(state);
    };
    if incoming.is_empty() {
        return Rc::clone(state);
    }

    let mut rows = state.rows.clone();
    let mut indexes = HashMap::clone(&state.row_indexes);
    let mut replaced = 0usize;
    for row in incoming {
        if let Some(slot) = indexes.get(&row.id).and_then(|&i| rows.get_mut(i)) {
            *slot = Rc::new(row.clone());
            replaced += 1;
        } else {
            indexes.insert(row.id.clone(), rows.len());
            rows.push(Rc::new(row.clone()));
        }
    }
    tracing::debug!(
        replaced,
        appended = incoming.len() - replaced,
        total = rows.len(),
        "append_rows"
    );

    Rc::new(RowState {
        row_indexes: Rc::new(index_rows(&rows)),
        rows,
        hovered_row: state.hovered_row.clone(),
        selected_rows: Rc::clone(&state.selected_rows),
    })
}

fn take_rows(state: &Rc<RowState>, action: &RowAction) -> Rc<RowState> {
    let RowAction::TakeRows(ids) = action else {
        return Rc::clone(state);
    };
    let doomed: HashSet<&str> = ids
        .iter()
        .map(String::as_str)
        .filter(|id| state.row_indexes.contains_key(*id))
        .collect();
    if doomed.is_empty() {
        return Rc::clone(state);
    }

    let rows: Vec<Rc<RowData>> = state
        .rows
        .iter()
        .filter(|row| !doomed.contains(row.id.as_str()))
        .cloned()
        .collect();
    let hovered_row = state
        .hovered_row
        .clone()
        .filter(|id| !doomed.contains(id.as_str()));
    let selected_rows = state
        .selected_rows
        .iter()
        .filter(|id| !doomed.contains(id.as_str()))
        .cloned()
        .collect();
    tracing::debug!(removed = doomed.len(), total = rows.len(), "take_rows");

    Rc::new(RowState {
        row_indexes: Rc::new(index_rows(&rows)),
        rows,
        hovered_row,
        selected_rows: Rc::new(selected_rows),
    })
}

fn index_rows(rows: &[Rc<RowData>]) -> HashMap<String, usize> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| (row.id.clone(), i))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with(rows: Vec<RowData>) -> RowStore {
        let store = RowStore::new();
        store.dispatch(RowAction::AppendRows(rows)).unwrap();
        store
    }

    #[test]
    fn append_overwrites_and_appends() {
        let store = store_with(vec![RowData::new("a").with("v", 1)]);
        store
            .dispatch(RowAction::AppendRows(vec![
                RowData::new("a").with("v", 2),
                RowData::new("b").with("v", 3),
            ]))
            .unwrap();
        let state = store.state();
        let got: Vec<_> = state
            .rows
            .iter()
            .map(|r| (r.id.as_str(), r.get("v").unwrap()))
            .collect();
        assert_eq!(got, vec![("a", json!(2)), ("b", json!(3))]);
        assert_eq!(store.row_index("b"), Some(1));
    }

    #[test]
    fn duplicate_ids_in_one_batch_keep_the_last() {
        let store = store_with(vec![
            RowData::new("a").with("v", 1),
            RowData::new("a").with("v", 2),
        ]);
        assert_eq!(store.row_count(), 1);
        assert_eq!(store.raw_cell_value("a", "v"), Some(json!(2)));
    }

    #[test]
    fn set_cell_value_unknown_row_is_noop() {
        let store = store_with(vec![RowData::new("a")]);
        let before = store.state();
        let after = store
            .dispatch(RowAction::SetCellValue {
                row: "zz".into(),
                column: "v".into(),
                value: json!(1),
            })
            .unwrap();
        assert!(Rc::ptr_eq(&before, &after));
    }

    #[test]
    fn set_cell_value_touches_one_row() {
        let store = store_with(vec![RowData::new("a").with("v", 1), RowData::new("b")]);
        let before = store.state();
        let after = store
            .dispatch(RowAction::SetCellValue {
                row: "a".into(),
                column: "v".into(),
                value: json!(9),
            })
            .unwrap();
        assert!(!Rc::ptr_eq(&before, &after));
        assert!(Rc::ptr_eq(&before.rows[1], &after.rows[1]));
        assert!(Rc::ptr_eq(&before.row_indexes, &after.row_indexes));
        assert_eq!(before.rows[0].get("v"), Some(json!(1)));
        assert_eq!(after.rows[0].get("v"), Some(json!(9)));
    }

    #[test]
    fn row_number_field() {
        let store = store_with(vec![RowData::new("a"), RowData::new("b")]);
        assert_eq!(store.raw_cell_value("b", ROW_NUMBER_FIELD), Some(json!(2)));
        assert_eq!(store.raw_cell_value("nope", ROW_NUMBER_FIELD), None);
    }

    #[test]
    fn take_rows_reindexes() {
        let store = store_with(vec![RowData::new("a"), RowData::new("b"), RowData::new("c")]);
        store
            .dispatch(RowAction::SelectRows(vec!["a".into(), "c".into()]))
            .unwrap();
        store
            .dispatch(RowAction::TakeRows(vec!["a".into()]))
            .unwrap();
        assert_eq!(store.row_id_by_index(0).as_deref(), Some("b"));
        assert_eq!(store.row_index("c"), Some(1));
        assert_eq!(*store.state().selected_rows, vec!["c".to_string()]);
    }

    #[test]
    fn hover_and_select_ignore_unknown_ids() {
        let store = store_with(vec![RowData::new("a")]);
        let before = store.state();
        let after = store
            .dispatch(RowAction::SetHoveredRow(Some("x".into())))
            .unwrap();
        assert!(Rc::ptr_eq(&before, &after));
        store
            .dispatch(RowAction::SelectRows(vec!["x".into(), "a".into()]))
            .unwrap();
        assert_eq!(*store.state().selected_rows, vec!["a".to_string()]);
    }

    #[test]
    fn clear_empties_everything() {
        let store = store_with(vec![RowData::new("a")]);
        store.dispatch(RowAction::Clear).unwrap();
        assert_eq!(store.row_count(), 0);
        assert!(store.state().row_indexes.is_empty());
    }
}
