//! Column store: column options, display order and zone layout.

use std::collections::HashMap;
use std::ops::Deref;
use std::rc::Rc;

use super::{Action, Store};
use crate::layout::ColumnLayout;
use crate::types::{ColumnOptions, Pinned};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnState {
    /// Columns in the order they were declared (or moved to).
    pub declared: Rc<Vec<Rc<ColumnOptions>>>,
    /// Columns in display order: pinned left, unpinned, pinned right.
    pub columns: Rc<Vec<Rc<ColumnOptions>>>,
    /// Field to display index.
    pub column_indexes: Rc<HashMap<String, usize>>,
    pub container_width: f32,
    pub layout: Rc<ColumnLayout>,
}

impl ColumnState {
    fn from_declared(declared: Vec<Rc<ColumnOptions>>, container_width: f32) -> Self {
        let mut columns: Vec<Rc<ColumnOptions>> = declared.clone();
        // Stable, so declaration order survives inside each zone.
        columns.sort_by_key(|c| match c.pinned {
            Some(Pinned::Left) => 0,
            None => 1,
            Some(Pinned::Right) => 2,
        });
        let column_indexes = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.field.clone(), i))
            .collect();
        let layout = ColumnLayout::compute(&columns, container_width);
        Self {
            declared: Rc::new(declared),
            columns: Rc::new(columns),
            column_indexes: Rc::new(column_indexes),
            container_width,
            layout: Rc::new(layout),
        }
    }

    pub fn column(&self, field: &str) -> Option<&Rc<ColumnOptions>> {
        self.column_indexes
            .get(field)
            .and_then(|&i| self.columns.get(i))
    }

    pub fn column_at(&self, index: u32) -> Option<&Rc<ColumnOptions>> {
        self.columns.get(index as usize)
    }

    pub fn column_index(&self, field: &str) -> Option<u32> {
        self.column_indexes
            .get(field)
            .and_then(|&i| u32::try_from(i).ok())
    }

    /// Rendered width of a column after flex distribution.
    pub fn column_width(&self, field: &str) -> Option<f32> {
        self.column_index(field).and_then(|i| self.layout.width(i))
    }

    /// Copy of the declared list with one column's options replaced.
    fn with_column(
        &self,
        field: &str,
        update: impl FnOnce(&mut ColumnOptions),
    ) -> Option<Vec<Rc<ColumnOptions>>> {
        let pos = self.declared.iter().position(|c| c.field == field)?;
        let mut declared = Vec::clone(&self.declared);
        let slot = declared.get_mut(pos)?;
        let mut options = ColumnOptions::clone(slot);
        update(&mut options);
        *slot = Rc::new(options);
        Some(declared)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnAction {
    SetColumns(Vec<ColumnOptions>),
    UpdateColumnWidth {
        field: String,
        width: Option<f32>,
        flex: Option<f32>,
    },
    UpdateColumnPinned {
        field: String,
        pinned: Option<Pinned>,
    },
    /// Move a column to display index `to`.
    MoveColumn {
        field: String,
        to: usize,
    },
    SetContainerWidth(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnActionKind {
    SetColumns,
    UpdateColumnWidth,
    UpdateColumnPinned,
    MoveColumn,
    SetContainerWidth,
}

impl ColumnActionKind {
    pub const ALL: [Self; 5] = [
        Self::SetColumns,
        Self::UpdateColumnWidth,
        Self::UpdateColumnPinned,
        Self::MoveColumn,
        Self::SetContainerWidth,
    ];
}

impl Action for ColumnAction {
    type Kind = ColumnActionKind;

    fn kind(&self) -> ColumnActionKind {
        match self {
            Self::SetColumns(_) => ColumnActionKind::SetColumns,
            Self::UpdateColumnWidth { .. } => ColumnActionKind::UpdateColumnWidth,
            Self::UpdateColumnPinned { .. } => ColumnActionKind::UpdateColumnPinned,
            Self::MoveColumn { .. } => ColumnActionKind::MoveColumn,
            Self::SetContainerWidth(_) => ColumnActionKind::SetContainerWidth,
        }
    }
}

#[derive(Clone)]
pub struct ColumnStore {
    store: Store<ColumnState, ColumnAction>,
}

impl Default for ColumnStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnStore {
    pub fn new() -> Self {
        let store = Store::new(ColumnActionKind::ALL, ColumnState::default());
        store.handle(ColumnActionKind::SetColumns, |state, action| match action {
            ColumnAction::SetColumns(columns) => {
                let declared = columns.iter().cloned().map(Rc::new).collect();
                Rc::new(ColumnState::from_declared(declared, state.container_width))
            }
            _ => Rc::clone(state),
        });
        store.handle(ColumnActionKind::UpdateColumnWidth, update_width);
        store.handle(ColumnActionKind::UpdateColumnPinned, |state, action| {
            let ColumnAction::UpdateColumnPinned { field, pinned } = action else {
                return Rc::clone(state);
            };
            if state.column(field).map_or(true, |c| c.pinned == *pinned) {
                return Rc::clone(state);
            }
            match state.with_column(field, |c| c.pinned = *pinned) {
                Some(declared) => Rc::new(ColumnState::from_declared(
                    declared,
                    state.container_width,
                )),
                None => Rc::clone(state),
            }
        });
        store.handle(ColumnActionKind::MoveColumn, move_column);
        store.handle(ColumnActionKind::SetContainerWidth, |state, action| {
            let ColumnAction::SetContainerWidth(width) = action else {
                return Rc::clone(state);
            };
            let width = width.max(0.0);
            if (width - state.container_width).abs() < f32::EPSILON {
                return Rc::clone(state);
            }
            Rc::new(ColumnState {
                container_width: width,
                layout: Rc::new(ColumnLayout::compute(&state.columns, width)),
                ..ColumnState::clone(state)
            })
        });
        Self { store }
    }

    pub fn column(&self, field: &str) -> Option<Rc<ColumnOptions>> {
        self.state().column(field).cloned()
    }

    pub fn column_at(&self, index: u32) -> Option<Rc<ColumnOptions>> {
        self.state().column_at(index).cloned()
    }

    pub fn column_index(&self, field: &str) -> Option<u32> {
        self.state().column_index(field)
    }

    pub fn column_count(&self) -> usize {
        self.state().columns.len()
    }
}

impl Deref for ColumnStore {
    type Target = Store<ColumnState, ColumnAction>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

fn update_width(state: &Rc<ColumnState>, action: &ColumnAction) -> Rc<ColumnState> {
    let ColumnAction::UpdateColumnWidth { field, width, flex } = action else {
        return Rc::clone(state);
    };
    let Some(current) = state.column(field) else {
        tracing::trace!(field = %field, "width update for unknown column");
        return Rc::clone(state);
    };
    let next_width = width.map_or(current.width, |w| w.max(current.min_width));
    let next_flex = match flex {
        Some(f) if *f > 0.0 => Some(*f),
        Some(_) => None,
        None => current.flex,
    };
    if (next_width - current.width).abs() < f32::EPSILON && next_flex == current.flex {
        return Rc::clone(state);
    }
    match state.with_column(field, |c| {
        c.width = next_width;
        c.flex = next_flex;
    }) {
        Some(declared) => Rc::new(ColumnState::from_declared(declared, state.container_width)),
        None => Rc::clone(state),
    }
}

fn move_column(state: &Rc<ColumnState>, action: &ColumnAction) -> Rc<ColumnState> {
    let ColumnAction::MoveColumn { field, to } = action else {
        return Rc::clone(state);
    };
    let Some(from) = state.column_indexes.get(field).copied() else {
        return Rc::clone(state);
    };
    let mut order = Vec::clone(&state.columns);
    let to = (*to).min(order.len().saturating_sub(1));
    if from == to {
        return Rc::clone(state);
    }
    let column = order.remove(from);
    order.insert(to, column);
    // Display order becomes the new declaration order; pinned columns are
    // pulled back into their zone by the partition.
    Rc::new(ColumnState::from_declared(order, state.container_width))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn options(field: &str, pinned: Option<Pinned>) -> ColumnOptions {
        let mut c = ColumnOptions::new(field);
        c.pinned = pinned;
        c
    }

    fn store() -> ColumnStore {
        let store = ColumnStore::new();
        store
            .dispatch(ColumnAction::SetColumns(vec![
                options("a", None),
                options("r", Some(Pinned::Right)),
                options("b", None),
                options("l", Some(Pinned::Left)),
            ]))
            .unwrap();
        store
    }

    fn order(store: &ColumnStore) -> Vec<String> {
        store.state().columns.iter().map(|c| c.field.clone()).collect()
    }

    #[test]
    fn display_order_partitions_by_pin() {
        let store = store();
        assert_eq!(order(&store), ["l", "a", "b", "r"]);
        assert_eq!(store.column_index("b"), Some(2));
    }

    #[test]
    fn unpinning_restores_declared_position() {
        let store = store();
        store
            .dispatch(ColumnAction::UpdateColumnPinned {
                field: "l".into(),
                pinned: None,
            })
            .unwrap();
        assert_eq!(order(&store), ["a", "b", "l", "r"]);
    }

    #[test]
    fn width_is_clamped_to_min() {
        let store = store();
        store
            .dispatch(ColumnAction::UpdateColumnWidth {
                field: "a".into(),
                width: Some(10.0),
                flex: None,
            })
            .unwrap();
        let a = store.column("a").unwrap();
        assert_eq!(a.width, a.min_width);
    }

    #[test]
    fn unknown_field_is_noop() {
        let store = store();
        let before = store.state();
        let after = store
            .dispatch(ColumnAction::UpdateColumnWidth {
                field: "zz".into(),
                width: Some(300.0),
                flex: None,
            })
            .unwrap();
        assert!(Rc::ptr_eq(&before, &after));
    }

    #[test]
    fn move_column_within_center() {
        let store = store();
        store
            .dispatch(ColumnAction::MoveColumn {
                field: "b".into(),
                to: 1,
            })
            .unwrap();
        assert_eq!(order(&store), ["l", "b", "a", "r"]);
    }

    #[test]
    fn container_width_drives_flex() {
        let store = store();
        store
            .dispatch(ColumnAction::UpdateColumnWidth {
                field: "a".into(),
                width: None,
                flex: Some(1.0),
            })
            .unwrap();
        store.dispatch(ColumnAction::SetContainerWidth(1000.0)).unwrap();
        // 1000 - three fixed 200px columns.
        assert_eq!(store.state().column_width("a"), Some(400.0));
        assert_eq!(store.column("a").unwrap().width, 200.0);
    }
}
