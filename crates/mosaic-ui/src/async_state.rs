//! Async-operation state tracker.
//!
//! `use_async` tracks one in-flight deferred operation: its status, the last
//! resolved value, and the last rejection reason. Every state mutation is
//! gated on a liveness flag tied to the owning scope, so a settlement arriving
//! after the view was torn down is dropped rather than applied.

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use mosaic_core::{HookError, Promise, Signal, on_unmount, remember, scoped_effect, signal};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsyncStatus {
    Idle,
    Pending,
    Resolved,
    Rejected,
}

/// Snapshot of the tracker. `data` and `error` keep their last value across
/// later transitions; a new resolve does not clear a stale `error`, and a new
/// reject does not clear stale `data`.
#[derive(Clone, Debug, PartialEq)]
pub struct AsyncState<T, E> {
    pub status: AsyncStatus,
    pub data: Option<T>,
    pub error: Option<E>,
}

impl<T, E> Default for AsyncState<T, E> {
    fn default() -> Self {
        Self {
            status: AsyncStatus::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T, E> AsyncState<T, E> {
    pub fn with_data(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }
}

/// Partial update with every field enumerated; `None` means "leave as is".
#[derive(Clone, Debug)]
pub struct AsyncPatch<T, E> {
    pub status: Option<AsyncStatus>,
    pub data: Option<T>,
    pub error: Option<E>,
}

impl<T, E> AsyncPatch<T, E> {
    pub fn status(status: AsyncStatus) -> Self {
        Self {
            status: Some(status),
            data: None,
            error: None,
        }
    }

    pub fn data(data: T) -> Self {
        Self {
            status: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: E) -> Self {
        Self {
            status: None,
            data: None,
            error: Some(error),
        }
    }

    pub fn resolved(data: T) -> Self {
        Self {
            status: Some(AsyncStatus::Resolved),
            data: Some(data),
            error: None,
        }
    }

    pub fn rejected(error: E) -> Self {
        Self {
            status: Some(AsyncStatus::Rejected),
            data: None,
            error: Some(error),
        }
    }
}

impl<T: Clone, E: Clone> AsyncState<T, E> {
    /// Field-by-field merge; unset patch fields keep the current value.
    pub fn apply(&self, patch: AsyncPatch<T, E>) -> Self {
        Self {
            status: patch.status.unwrap_or(self.status),
            data: patch.data.or_else(|| self.data.clone()),
            error: patch.error.or_else(|| self.error.clone()),
        }
    }
}

/// Cloneable handle to an async-state tracker slot.
pub struct UseAsync<T: 'static, E: 'static> {
    state: Signal<AsyncState<T, E>>,
    initial: Rc<AsyncState<T, E>>,
    alive: Rc<Cell<bool>>,
}

impl<T, E> Clone for UseAsync<T, E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            initial: self.initial.clone(),
            alive: self.alive.clone(),
        }
    }
}

/// Tracker with the default initial state (`Idle`, no data, no error).
pub fn use_async<T: Clone + 'static, E: Clone + 'static>() -> UseAsync<T, E> {
    use_async_with(AsyncState::default())
}

/// Tracker with caller-supplied initial state. The initial snapshot is what
/// [`UseAsync::reset`] restores, overrides included.
pub fn use_async_with<T: Clone + 'static, E: Clone + 'static>(
    initial: AsyncState<T, E>,
) -> UseAsync<T, E> {
    let tracker = remember(move || UseAsync {
        state: signal(initial.clone()),
        initial: Rc::new(initial),
        alive: Rc::new(Cell::new(true)),
    });

    // One detach guard per call-site: the scope disposer flips the liveness
    // flag, and every later dispatch becomes a no-op.
    let installed = remember(|| Cell::new(false));
    if !installed.get() {
        installed.set(true);
        let alive = tracker.alive.clone();
        scoped_effect(move || on_unmount(move || alive.set(false)));
    }

    (*tracker).clone()
}

impl<T: Clone + 'static, E: Clone + 'static> UseAsync<T, E> {
    pub fn state(&self) -> AsyncState<T, E> {
        self.state.get()
    }

    pub fn status(&self) -> AsyncStatus {
        self.state.with(|s| s.status)
    }

    pub fn data(&self) -> Option<T> {
        self.state.with(|s| s.data.clone())
    }

    pub fn error(&self) -> Option<E> {
        self.state.with(|s| s.error.clone())
    }

    pub fn is_idle(&self) -> bool {
        self.status() == AsyncStatus::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status() == AsyncStatus::Pending
    }

    pub fn is_error(&self) -> bool {
        self.status() == AsyncStatus::Rejected
    }

    pub fn is_success(&self) -> bool {
        self.status() == AsyncStatus::Resolved
    }

    fn dispatch(&self, patch: AsyncPatch<T, E>) {
        if !self.alive.get() {
            return;
        }
        self.state.update(|s| *s = s.apply(patch));
    }

    /// Starts tracking `op`: transitions to `Pending` immediately (status
    /// only), then to `Resolved` or `Rejected` when `op` settles. Returns a
    /// forwarding promise with the same outcome so callers can chain.
    ///
    /// Calling `run` again from any state re-enters `Pending`. The underlying
    /// operation is never cancelled; after the owning scope is disposed only
    /// its effect on this tracker is suppressed.
    pub fn run(&self, op: Promise<T, E>) -> Promise<T, E> {
        self.dispatch(AsyncPatch::status(AsyncStatus::Pending));

        let on_ok = {
            let this = self.clone();
            move |v: T| this.dispatch(AsyncPatch::resolved(v))
        };
        let on_err = {
            let this = self.clone();
            move |e: E| this.dispatch(AsyncPatch::rejected(e))
        };
        op.then(on_ok, on_err)
    }

    /// Dynamic entry point for callers holding an untyped value. Anything
    /// that is not a `Promise<T, E>` fails fast, synchronously, before any
    /// state change.
    pub fn run_any(&self, op: Box<dyn Any>) -> Result<Promise<T, E>, HookError> {
        match op.downcast::<Promise<T, E>>() {
            Ok(p) => Ok(self.run(*p)),
            Err(_) => Err(HookError::InvalidArgument("run expects an awaitable")),
        }
    }

    /// Manually merges a data value; status untouched.
    pub fn set_data(&self, data: T) {
        self.dispatch(AsyncPatch::data(data));
    }

    /// Manually merges an error value; status untouched.
    pub fn set_error(&self, error: E) {
        self.dispatch(AsyncPatch::error(error));
    }

    /// Restores the constructor-time snapshot, caller overrides included.
    pub fn reset(&self) {
        if !self.alive.get() {
            return;
        }
        self.state.set((*self.initial).clone());
    }
}
