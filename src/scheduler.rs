//! Cooperative single-threaded task queue and a push-based visibility
//! observer.
//!
//! Nothing here spawns threads or timers. The host drives the queue with
//! [`Scheduler::tick`]; in the browser the bindings flush it on a microtask
//! whenever work is queued.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

/// Upper bound on ticks in [`Scheduler::run_until_idle`].
const MAX_IDLE_TICKS: usize = 1024;

/// Shared cancellation flag for a queued task.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Handle to a queued task. Dropping the handle cancels the task.
#[must_use = "dropping a TaskHandle cancels the task"]
#[derive(Debug)]
pub struct TaskHandle {
    token: CancellationToken,
    detached: bool,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Let the task run even though nobody holds the handle.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if !self.detached {
            self.token.cancel();
        }
    }
}

struct Task {
    token: CancellationToken,
    run: Box<dyn FnOnce()>,
}

type WakeFn = Rc<dyn Fn()>;

/// FIFO queue of deferred tasks.
#[derive(Default)]
pub struct Scheduler {
    queue: RefCell<VecDeque<Task>>,
    wake: RefCell<Option<WakeFn>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("queued", &self.queue.borrow().len())
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called whenever the queue goes from empty to non-empty.
    pub fn set_wake(&self, wake: impl Fn() + 'static) {
        *self.wake.borrow_mut() = Some(Rc::new(wake));
    }

    /// Queue `task` for the next tick.
    pub fn schedule(&self, task: impl FnOnce() + 'static) -> TaskHandle {
        let token = CancellationToken::default();
        let was_empty = {
            let mut queue = self.queue.borrow_mut();
            let was_empty = queue.is_empty();
            queue.push_back(Task {
                token: token.clone(),
                run: Box::new(task),
            });
            was_empty
        };
        if was_empty {
            let wake = self.wake.borrow().clone();
            if let Some(wake) = wake {
                wake();
            }
        }
        TaskHandle {
            token,
            detached: false,
        }
    }

    /// Run every task queued before this call. Tasks scheduled while running
    /// wait for the next tick. Returns the number of tasks run.
    pub fn tick(&self) -> usize {
        let batch = std::mem::take(&mut *self.queue.borrow_mut());
        let mut ran = 0;
        for task in batch {
            if task.token.is_cancelled() {
                continue;
            }
            (task.run)();
            ran += 1;
        }
        ran
    }

    /// Tick until the queue is empty.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        for _ in 0..MAX_IDLE_TICKS {
            if self.queue.borrow().is_empty() {
                return ran;
            }
            ran += self.tick();
        }
        tracing::warn!(ticks = MAX_IDLE_TICKS, "scheduler did not settle");
        ran
    }

    /// Queued tasks that have not been cancelled.
    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .iter()
            .filter(|t| !t.token.is_cancelled())
            .count()
    }
}

enum Watch {
    Waiting(Rc<dyn Fn()>),
    Fired { _pending: TaskHandle },
}

/// One-shot visibility notifications keyed by `K`.
///
/// The owner pushes the current visible set through
/// [`VisibilityObserver::notify`]; each observed key that is visible has its
/// callback queued on the scheduler once, and is then no longer watched.
pub struct VisibilityObserver<K> {
    scheduler: Rc<Scheduler>,
    watched: RefCell<HashMap<K, Watch>>,
}

impl<K: Eq + Hash + Clone + 'static> VisibilityObserver<K> {
    pub fn new(scheduler: Rc<Scheduler>) -> Rc<Self> {
        Rc::new(Self {
            scheduler,
            watched: RefCell::new(HashMap::new()),
        })
    }

    /// Watch `key`. Dropping the returned guard stops watching and cancels a
    /// notification that has been queued but not yet delivered.
    pub fn observe(self: &Rc<Self>, key: K, callback: impl Fn() + 'static) -> Observation {
        self.watched
            .borrow_mut()
            .insert(key.clone(), Watch::Waiting(Rc::new(callback)));
        let weak: Weak<Self> = Rc::downgrade(self);
        Observation {
            release: Some(Box::new(move || {
                if let Some(observer) = weak.upgrade() {
                    observer.watched.borrow_mut().remove(&key);
                }
            })),
        }
    }

    /// Queue callbacks for every waiting key that `is_visible` accepts.
    pub fn notify(&self, is_visible: impl Fn(&K) -> bool) -> usize {
        let mut watched = self.watched.borrow_mut();
        let mut fired = 0;
        for watch in watched.iter_mut().filter(|(k, _)| is_visible(k)).map(|(_, w)| w) {
            if let Watch::Waiting(callback) = watch {
                let callback = Rc::clone(callback);
                let handle = self.scheduler.schedule(move || callback());
                *watch = Watch::Fired { _pending: handle };
                fired += 1;
            }
        }
        fired
    }

    pub fn is_waiting(&self, key: &K) -> bool {
        matches!(self.watched.borrow().get(key), Some(Watch::Waiting(_)))
    }
}

/// Guard returned by [`VisibilityObserver::observe`].
#[must_use = "dropping an Observation stops observing"]
pub struct Observation {
    release: Option<Box<dyn FnOnce()>>,
}

impl Drop for Observation {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Observation")
    }
}
