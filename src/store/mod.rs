//! Action/reducer state containers.
//!
//! A [`Store`] owns one immutable state snapshot behind an `Rc`. Each action
//! kind has at most one reducer that maps `(state, action)` to the next
//! snapshot; returning the same `Rc` means "unchanged", so subscribers can
//! detect change with `Rc::ptr_eq`. Dispatch is synchronous: the reducer
//! runs, the snapshot is swapped, then subscribers of that kind run in
//! subscription order. A subscriber may dispatch again; the nested dispatch
//! completes before the outer notification loop continues.
//!
//! The row, column and selection stores in the submodules register their
//! reducers on construction.

mod column;
mod row;
mod selection;

pub use column::{ColumnAction, ColumnActionKind, ColumnState, ColumnStore};
pub use row::{RowAction, RowActionKind, RowState, RowStore, ROW_NUMBER_FIELD};
pub use selection::{SelectionAction, SelectionActionKind, SelectionState, SelectionStore};

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use crate::error::{GridError, Result};

/// An action payload with a discriminant that selects its reducer.
pub trait Action: 'static {
    type Kind: Copy + Eq + Hash + fmt::Debug + 'static;

    fn kind(&self) -> Self::Kind;
}

pub type Reducer<S, A> = Rc<dyn Fn(&Rc<S>, &A) -> Rc<S>>;
pub type Listener<S, A> = Rc<dyn Fn(&S, &A)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct ListenerEntry<S, A> {
    id: SubscriptionId,
    alive: Rc<Cell<bool>>,
    callback: Listener<S, A>,
}

impl<S, A> Clone for ListenerEntry<S, A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            alive: Rc::clone(&self.alive),
            callback: Rc::clone(&self.callback),
        }
    }
}

struct StoreInner<S, A: Action> {
    state: RefCell<Rc<S>>,
    reducers: RefCell<HashMap<A::Kind, Reducer<S, A>>>,
    listeners: RefCell<HashMap<A::Kind, Vec<ListenerEntry<S, A>>>>,
    next_id: Cell<u64>,
}

/// Generic action/reducer container. Cloning yields another handle to the
/// same store.
pub struct Store<S, A: Action> {
    inner: Rc<StoreInner<S, A>>,
}

impl<S, A: Action> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: 'static, A: Action> Store<S, A> {
    /// Create a store with an empty subscriber list for each of `kinds`.
    pub fn new(kinds: impl IntoIterator<Item = A::Kind>, initial: S) -> Self {
        let listeners = kinds.into_iter().map(|k| (k, Vec::new())).collect();
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(Rc::new(initial)),
                reducers: RefCell::new(HashMap::new()),
                listeners: RefCell::new(listeners),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Register the reducer for `kind`, replacing any previous one.
    pub fn handle(&self, kind: A::Kind, reducer: impl Fn(&Rc<S>, &A) -> Rc<S> + 'static) {
        let previous = self
            .inner
            .reducers
            .borrow_mut()
            .insert(kind, Rc::new(reducer));
        if previous.is_some() {
            tracing::warn!(action = ?kind, "reducer replaced");
        }
    }

    /// Run the reducer for `action`, swap in its result and notify
    /// subscribers of that kind. Returns the new snapshot.
    ///
    /// # Errors
    /// Returns [`GridError::UnhandledAction`] if no reducer is registered for
    /// the action's kind.
    pub fn dispatch(&self, action: A) -> Result<Rc<S>> {
        let kind = action.kind();
        let reducer = self
            .inner
            .reducers
            .borrow()
            .get(&kind)
            .cloned()
            .ok_or_else(|| GridError::UnhandledAction(format!("{kind:?}")))?;

        let current = self.state();
        let next = reducer(&current, &action);
        let changed = !Rc::ptr_eq(&current, &next);
        tracing::trace!(action = ?kind, changed, "dispatch");
        *self.inner.state.borrow_mut() = Rc::clone(&next);

        // Snapshot so subscribers can (un)subscribe while we iterate.
        let listeners: Vec<ListenerEntry<S, A>> = self
            .inner
            .listeners
            .borrow()
            .get(&kind)
            .cloned()
            .unwrap_or_default();
        for entry in listeners {
            if entry.alive.get() {
                (entry.callback)(&next, &action);
            }
        }
        Ok(next)
    }

    /// Subscribe to actions of `kind`. The callback receives the updated
    /// snapshot and the action that produced it.
    pub fn subscribe(&self, kind: A::Kind, callback: impl Fn(&S, &A) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(ListenerEntry {
                id,
                alive: Rc::new(Cell::new(true)),
                callback: Rc::new(callback),
            });
        id
    }

    /// Remove a subscription. Returns `false` if it was not registered.
    ///
    /// Safe to call from inside a notification: the removed callback is not
    /// invoked again, and the remaining callbacks run exactly once.
    pub fn unsubscribe(&self, kind: A::Kind, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(&kind) else {
            return false;
        };
        let Some(pos) = list.iter().position(|e| e.id == id) else {
            return false;
        };
        let entry = list.remove(pos);
        entry.alive.set(false);
        true
    }

    /// Like [`Store::subscribe`], but the subscription ends when the
    /// returned guard is dropped.
    pub fn subscribe_scoped(
        &self,
        kind: A::Kind,
        callback: impl Fn(&S, &A) + 'static,
    ) -> Subscription {
        let id = self.subscribe(kind, callback);
        let weak: Weak<StoreInner<S, A>> = Rc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Store { inner }.unsubscribe(kind, id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self, kind: A::Kind) -> usize {
        self.inner
            .listeners
            .borrow()
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

/// RAII guard returned by [`Store::subscribe_scoped`].
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Keep the subscription alive for the lifetime of the store.
    pub fn detach(mut self) {
        self.release = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum CounterAction {
        Add(i32),
        Noop,
        Unknown,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum CounterKind {
        Add,
        Noop,
        Unknown,
    }

    impl Action for CounterAction {
        type Kind = CounterKind;

        fn kind(&self) -> CounterKind {
            match self {
                Self::Add(_) => CounterKind::Add,
                Self::Noop => CounterKind::Noop,
                Self::Unknown => CounterKind::Unknown,
            }
        }
    }

    fn counter() -> Store<i32, CounterAction> {
        let store = Store::new([CounterKind::Add, CounterKind::Noop], 0);
        store.handle(CounterKind::Add, |s, a| match a {
            CounterAction::Add(n) => Rc::new(**s + n),
            _ => Rc::clone(s),
        });
        store.handle(CounterKind::Noop, |s, _| Rc::clone(s));
        store
    }

    #[test]
    fn dispatch_replaces_state_before_notifying() {
        let store = counter();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let handle = store.clone();
        store.subscribe(CounterKind::Add, move |s, _| {
            log.borrow_mut().push((*s, *handle.state()));
        });
        store.dispatch(CounterAction::Add(2)).unwrap();
        assert_eq!(*seen.borrow(), vec![(2, 2)]);
    }

    #[test]
    fn noop_keeps_reference() {
        let store = counter();
        let before = store.state();
        let after = store.dispatch(CounterAction::Noop).unwrap();
        assert!(Rc::ptr_eq(&before, &after));
    }

    #[test]
    fn unhandled_kind_is_an_error() {
        let store = counter();
        assert!(matches!(
            store.dispatch(CounterAction::Unknown),
            Err(GridError::UnhandledAction(_))
        ));
    }

    #[test]
    fn subscribers_run_in_order() {
        let store = counter();
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let order = Rc::clone(&order);
            store.subscribe(CounterKind::Add, move |_, _| order.borrow_mut().push(i));
        }
        store.dispatch(CounterAction::Add(1)).unwrap();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn nested_dispatch_completes_first() {
        let store = counter();
        let order = Rc::new(RefCell::new(Vec::new()));
        let inner_store = store.clone();
        let o1 = Rc::clone(&order);
        store.subscribe(CounterKind::Add, move |s, _| {
            o1.borrow_mut().push(format!("first:{s}"));
            if *s == 1 {
                inner_store.dispatch(CounterAction::Add(10)).unwrap();
            }
        });
        let o2 = Rc::clone(&order);
        store.subscribe(CounterKind::Add, move |s, _| {
            o2.borrow_mut().push(format!("second:{s}"));
        });
        store.dispatch(CounterAction::Add(1)).unwrap();
        assert_eq!(
            *order.borrow(),
            vec!["first:1", "first:11", "second:11", "second:1"]
        );
        assert_eq!(*store.state(), 11);
    }

    #[test]
    fn unsubscribe_during_dispatch() {
        let store = counter();
        let hits = Rc::new(RefCell::new(Vec::new()));

        // Subscriber 0 removes subscriber 1 mid-dispatch.
        let victim: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
        let victim_ref = Rc::clone(&victim);
        let handle = store.clone();
        let h0 = Rc::clone(&hits);
        store.subscribe(CounterKind::Add, move |_, _| {
            h0.borrow_mut().push(0);
            if let Some(id) = victim_ref.take() {
                handle.unsubscribe(CounterKind::Add, id);
            }
        });
        let h1 = Rc::clone(&hits);
        victim.set(Some(store.subscribe(CounterKind::Add, move |_, _| {
            h1.borrow_mut().push(1);
        })));
        let h2 = Rc::clone(&hits);
        store.subscribe(CounterKind::Add, move |_, _| h2.borrow_mut().push(2));

        store.dispatch(CounterAction::Add(1)).unwrap();
        assert_eq!(*hits.borrow(), vec![0, 2]);
        assert_eq!(store.subscriber_count(CounterKind::Add), 2);
    }

    #[test]
    fn self_unsubscribe_during_dispatch() {
        let store = counter();
        let hits = Rc::new(Cell::new(0));
        let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
        let own = Rc::clone(&own_id);
        let handle = store.clone();
        let h = Rc::clone(&hits);
        own_id.set(Some(store.subscribe(CounterKind::Add, move |_, _| {
            h.set(h.get() + 1);
            if let Some(id) = own.get() {
                handle.unsubscribe(CounterKind::Add, id);
            }
        })));
        let after = Rc::new(Cell::new(0));
        let a = Rc::clone(&after);
        store.subscribe(CounterKind::Add, move |_, _| a.set(a.get() + 1));

        store.dispatch(CounterAction::Add(1)).unwrap();
        store.dispatch(CounterAction::Add(1)).unwrap();
        assert_eq!(hits.get(), 1);
        assert_eq!(after.get(), 2);
    }

    #[test]
    fn scoped_subscription_releases_on_drop() {
        let store = counter();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let guard = store.subscribe_scoped(CounterKind::Add, move |_, _| h.set(h.get() + 1));
        store.dispatch(CounterAction::Add(1)).unwrap();
        drop(guard);
        store.dispatch(CounterAction::Add(1)).unwrap();
        assert_eq!(hits.get(), 1);
        assert_eq!(store.subscriber_count(CounterKind::Add), 0);
    }
}
