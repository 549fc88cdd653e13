//! Selection store: active ranges, active cell, fill preview, editing cell.

use std::ops::Deref;
use std::rc::Rc;

use super::{Action, Store};
use crate::selection::{FillRange, SelectionRange};
use crate::types::{CellPosition, Coordinate};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Active ranges; the last one is the range keyboard and fill act on.
    pub ranges: Vec<SelectionRange>,
    pub active_cell: Option<Coordinate>,
    pub fill: Option<FillRange>,
    pub editing: Option<CellPosition>,
}

impl SelectionState {
    pub fn active_range(&self) -> Option<&SelectionRange> {
        self.ranges.last()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionAction {
    /// Replace the ranges. Without an explicit active cell the last range's
    /// anchor becomes active.
    SetRanges {
        ranges: Vec<SelectionRange>,
        active: Option<Coordinate>,
    },
    SetActiveCell(Option<Coordinate>),
    SetFill(Option<FillRange>),
    StartEditing(CellPosition),
    StopEditing,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionActionKind {
    SetRanges,
    SetActiveCell,
    SetFill,
    StartEditing,
    StopEditing,
    Clear,
}

impl SelectionActionKind {
    pub const ALL: [Self; 6] = [
        Self::SetRanges,
        Self::SetActiveCell,
        Self::SetFill,
        Self::StartEditing,
        Self::StopEditing,
        Self::Clear,
    ];
}

impl Action for SelectionAction {
    type Kind = SelectionActionKind;

    fn kind(&self) -> SelectionActionKind {
        match self {
            Self::SetRanges { .. } => SelectionActionKind::SetRanges,
            Self::SetActiveCell(_) => SelectionActionKind::SetActiveCell,
            Self::SetFill(_) => SelectionActionKind::SetFill,
            Self::StartEditing(_) => SelectionActionKind::StartEditing,
            Self::StopEditing => SelectionActionKind::StopEditing,
            Self::Clear => SelectionActionKind::Clear,
        }
    }
}

#[derive(Clone)]
pub struct SelectionStore {
    store: Store<SelectionState, SelectionAction>,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStore {
    pub fn new() -> Self {
        let store = Store::new(SelectionActionKind::ALL, SelectionState::default());
        store.handle(SelectionActionKind::SetRanges, |state, action| {
            let SelectionAction::SetRanges { ranges, active } = action else {
                return Rc::clone(state);
            };
            let active_cell = active.or_else(|| ranges.last().map(SelectionRange::anchor));
            if state.ranges == *ranges && state.active_cell == active_cell {
                return Rc::clone(state);
            }
            Rc::new(SelectionState {
                ranges: ranges.clone(),
                active_cell,
                ..SelectionState::clone(state)
            })
        });
        store.handle(SelectionActionKind::SetActiveCell, |state, action| {
            let SelectionAction::SetActiveCell(active_cell) = action else {
                return Rc::clone(state);
            };
            if state.active_cell == *active_cell {
                return Rc::clone(state);
            }
            Rc::new(SelectionState {
                active_cell: *active_cell,
                ..SelectionState::clone(state)
            })
        });
        store.handle(SelectionActionKind::SetFill, |state, action| {
            let SelectionAction::SetFill(fill) = action else {
                return Rc::clone(state);
            };
            if state.fill == *fill {
                return Rc::clone(state);
            }
            Rc::new(SelectionState {
                fill: *fill,
                ..SelectionState::clone(state)
            })
        });
        store.handle(SelectionActionKind::StartEditing, |state, action| {
            let SelectionAction::StartEditing(position) = action else {
                return Rc::clone(state);
            };
            if state.editing.as_ref() == Some(position) {
                return Rc::clone(state);
            }
            Rc::new(SelectionState {
                editing: Some(position.clone()),
                ..SelectionState::clone(state)
            })
        });
        store.handle(SelectionActionKind::StopEditing, |state, _| {
            if state.editing.is_none() {
                return Rc::clone(state);
            }
            Rc::new(SelectionState {
                editing: None,
                ..SelectionState::clone(state)
            })
        });
        store.handle(SelectionActionKind::Clear, |state, _| {
            if **state == SelectionState::default() {
                return Rc::clone(state);
            }
            Rc::new(SelectionState::default())
        });
        Self { store }
    }

    pub fn ranges(&self) -> Vec<SelectionRange> {
        self.state().ranges.clone()
    }

    pub fn active_cell(&self) -> Option<Coordinate> {
        self.state().active_cell
    }

    pub fn editing(&self) -> Option<CellPosition> {
        self.state().editing.clone()
    }
}

impl Deref for SelectionStore {
    type Target = Store<SelectionState, SelectionAction>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_ranges_defaults_active_to_last_anchor() {
        let store = SelectionStore::new();
        let ranges = vec![
            SelectionRange::single(Coordinate::new(0, 0)),
            SelectionRange::new(Coordinate::new(3, 4), Coordinate::new(1, 1)),
        ];
        store
            .dispatch(SelectionAction::SetRanges {
                ranges,
                active: None,
            })
            .unwrap();
        assert_eq!(store.active_cell(), Some(Coordinate::new(3, 4)));
    }

    #[test]
    fn identical_ranges_keep_reference() {
        let store = SelectionStore::new();
        let action = SelectionAction::SetRanges {
            ranges: vec![SelectionRange::single(Coordinate::new(1, 1))],
            active: None,
        };
        let first = store.dispatch(action.clone()).unwrap();
        let second = store.dispatch(action).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn editing_round_trip() {
        let store = SelectionStore::new();
        let pos = CellPosition::new("r1", "name");
        store
            .dispatch(SelectionAction::StartEditing(pos.clone()))
            .unwrap();
        assert_eq!(store.editing(), Some(pos));
        store.dispatch(SelectionAction::StopEditing).unwrap();
        assert_eq!(store.editing(), None);
    }
}
