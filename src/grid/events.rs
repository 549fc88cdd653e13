//! Before/after hooks around user-facing grid actions.
//!
//! Every action has a [`HookKind`]. Before hooks run in registration order;
//! the first one returning `ControlFlow::Break(())` cancels the action, in
//! which case nothing changes and no after hook runs. After hooks only
//! observe.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::selection::FillRange;
use crate::types::{CellPosition, Coordinate, KeyInput, MenuItem, MouseInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    CellDoubleClick,
    CellMouseDown,
    CellMouseMove,
    FillerMouseDown,
    Filling,
    SelectionChange,
    ContextMenuShow,
    ColumnResizing,
    KeyDown,
    KeyPress,
    KeyUp,
    Copy,
    Paste,
}

/// Payload passed to hooks.
#[derive(Debug, Clone, Copy)]
pub enum HookEvent<'a> {
    CellDoubleClick {
        position: &'a CellPosition,
        mouse: &'a MouseInput,
    },
    CellMouseDown {
        position: &'a CellPosition,
        mouse: &'a MouseInput,
    },
    CellMouseMove {
        position: &'a CellPosition,
        mouse: &'a MouseInput,
    },
    FillerMouseDown {
        position: &'a CellPosition,
        mouse: &'a MouseInput,
    },
    Filling(&'a FillRange),
    SelectionChange {
        start: Coordinate,
        end: Coordinate,
    },
    ContextMenuShow {
        position: &'a CellPosition,
        items: &'a [MenuItem],
    },
    ColumnResizing {
        column: &'a str,
        width: f32,
    },
    KeyDown(&'a KeyInput),
    KeyPress(&'a KeyInput),
    KeyUp(&'a KeyInput),
    Copy(&'a str),
    Paste(&'a str),
}

impl HookEvent<'_> {
    pub fn kind(&self) -> HookKind {
        match self {
            Self::CellDoubleClick { .. } => HookKind::CellDoubleClick,
            Self::CellMouseDown { .. } => HookKind::CellMouseDown,
            Self::CellMouseMove { .. } => HookKind::CellMouseMove,
            Self::FillerMouseDown { .. } => HookKind::FillerMouseDown,
            Self::Filling(_) => HookKind::Filling,
            Self::SelectionChange { .. } => HookKind::SelectionChange,
            Self::ContextMenuShow { .. } => HookKind::ContextMenuShow,
            Self::ColumnResizing { .. } => HookKind::ColumnResizing,
            Self::KeyDown(_) => HookKind::KeyDown,
            Self::KeyPress(_) => HookKind::KeyPress,
            Self::KeyUp(_) => HookKind::KeyUp,
            Self::Copy(_) => HookKind::Copy,
            Self::Paste(_) => HookKind::Paste,
        }
    }
}

pub type BeforeHook = Rc<dyn Fn(&HookEvent<'_>) -> ControlFlow<()>>;
pub type AfterHook = Rc<dyn Fn(&HookEvent<'_>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// Per-grid hook table.
#[derive(Default)]
pub struct Hooks {
    before: RefCell<HashMap<HookKind, Vec<(HookId, BeforeHook)>>>,
    after: RefCell<HashMap<HookKind, Vec<(HookId, AfterHook)>>>,
    next_id: Cell<u64>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn count<T>(m: &HashMap<HookKind, Vec<T>>) -> usize {
            m.values().map(Vec::len).sum()
        }
        f.debug_struct("Hooks")
            .field("before", &count(&self.before.borrow()))
            .field("after", &count(&self.after.borrow()))
            .finish()
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> HookId {
        let id = HookId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        id
    }

    pub fn before(
        &self,
        kind: HookKind,
        hook: impl Fn(&HookEvent<'_>) -> ControlFlow<()> + 'static,
    ) -> HookId {
        let id = self.next_id();
        self.before
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((id, Rc::new(hook)));
        id
    }

    pub fn after(&self, kind: HookKind, hook: impl Fn(&HookEvent<'_>) + 'static) -> HookId {
        let id = self.next_id();
        self.after
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((id, Rc::new(hook)));
        id
    }

    /// Remove a hook of either phase.
    pub fn remove(&self, id: HookId) -> bool {
        let mut removed = false;
        for list in self.before.borrow_mut().values_mut() {
            let len = list.len();
            list.retain(|(h, _)| *h != id);
            removed |= list.len() != len;
        }
        for list in self.after.borrow_mut().values_mut() {
            let len = list.len();
            list.retain(|(h, _)| *h != id);
            removed |= list.len() != len;
        }
        removed
    }

    /// Run before hooks. Returns `false` if one of them cancelled.
    pub fn run_before(&self, event: &HookEvent<'_>) -> bool {
        let hooks: Vec<BeforeHook> = self
            .before
            .borrow()
            .get(&event.kind())
            .map(|list| list.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();
        for hook in hooks {
            if hook(event).is_break() {
                tracing::debug!(hook = ?event.kind(), "cancelled by before hook");
                return false;
            }
        }
        true
    }

    pub fn run_after(&self, event: &HookEvent<'_>) {
        let hooks: Vec<AfterHook> = self
            .after
            .borrow()
            .get(&event.kind())
            .map(|list| list.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();
        for hook in hooks {
            hook(event);
        }
    }

    /// Wrap `action` in the before and after hooks for `event`. Returns
    /// `None` when a before hook cancelled.
    pub fn run<R>(&self, event: &HookEvent<'_>, action: impl FnOnce() -> R) -> Option<R> {
        if !self.run_before(event) {
            return None;
        }
        let result = action();
        self.run_after(event);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn before_hook_can_cancel() {
        let hooks = Hooks::new();
        let after_ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&after_ran);
        hooks.before(HookKind::Copy, |event| match event {
            HookEvent::Copy(text) if text.contains("secret") => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        });
        hooks.after(HookKind::Copy, move |_| flag.set(true));

        assert_eq!(hooks.run(&HookEvent::Copy("secret"), || 1), None);
        assert!(!after_ran.get());
        assert_eq!(hooks.run(&HookEvent::Copy("plain"), || 2), Some(2));
        assert!(after_ran.get());
    }

    #[test]
    fn debug_counts_hooks_on_both_sides() {
        let hooks = Hooks::new();
        hooks.before(HookKind::Copy, |_| ControlFlow::Continue(()));
        hooks.before(HookKind::Paste, |_| ControlFlow::Continue(()));
        let id = hooks.after(HookKind::Copy, |_| {});
        assert_eq!(format!("{hooks:?}"), "Hooks { before: 2, after: 1 }");
        hooks.remove(id);
        assert_eq!(format!("{hooks:?}"), "Hooks { before: 2, after: 0 }");
    }

    #[test]
    fn first_cancel_stops_later_before_hooks() {
        let hooks = Hooks::new();
        let later = Rc::new(Cell::new(false));
        let l = Rc::clone(&later);
        hooks.before(HookKind::Paste, |_| ControlFlow::Break(()));
        hooks.before(HookKind::Paste, move |_| {
            l.set(true);
            ControlFlow::Continue(())
        });
        assert!(!hooks.run_before(&HookEvent::Paste("x")));
        assert!(!later.get());
    }

    #[test]
    fn removed_hook_no_longer_runs() {
        let hooks = Hooks::new();
        let id = hooks.before(HookKind::KeyUp, |_| ControlFlow::Break(()));
        assert!(hooks.remove(id));
        assert!(!hooks.remove(id));
        let key = KeyInput::new("a");
        assert!(hooks.run_before(&HookEvent::KeyUp(&key)));
    }

    #[test]
    fn hooks_only_see_their_kind() {
        let hooks = Hooks::new();
        hooks.before(HookKind::KeyDown, |_| ControlFlow::Break(()));
        let key = KeyInput::new("a");
        assert!(hooks.run_before(&HookEvent::KeyPress(&key)));
        assert!(!hooks.run_before(&HookEvent::KeyDown(&key)));
    }
}
