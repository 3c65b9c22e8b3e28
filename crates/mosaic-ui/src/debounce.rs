//! Trailing-edge debounced state holder.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mosaic_core::timer::{self, TimerHandle};
use mosaic_core::{Signal, on_unmount, remember, scoped_effect, signal};
use web_time::Duration;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(200);

/// State cell whose `set` lands only after a quiet period: each call cancels
/// the previous pending update and reschedules, so only the last value of a
/// burst takes effect.
pub struct DebouncedState<T: Clone + 'static> {
    value: Signal<T>,
    pending: Rc<RefCell<Option<TimerHandle>>>,
    quiet: Duration,
    alive: Rc<Cell<bool>>,
}

impl<T: Clone + 'static> Clone for DebouncedState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            pending: self.pending.clone(),
            quiet: self.quiet,
            alive: self.alive.clone(),
        }
    }
}

/// Debounced state with the default 200 ms quiet period.
pub fn use_debounced_state<T: Clone + 'static>(init: impl FnOnce() -> T) -> DebouncedState<T> {
    use_debounced_state_with(init, DEFAULT_QUIET_PERIOD)
}

pub fn use_debounced_state_with<T: Clone + 'static>(
    init: impl FnOnce() -> T,
    quiet: Duration,
) -> DebouncedState<T> {
    let holder = remember(move || DebouncedState {
        value: signal(init()),
        pending: Rc::new(RefCell::new(None)),
        quiet,
        alive: Rc::new(Cell::new(true)),
    });

    // On detach: cancel an in-flight update and gate the setters off, so a
    // handle that outlives the view stops mutating state nobody observes.
    let installed = remember(|| Cell::new(false));
    if !installed.get() {
        installed.set(true);
        let pending = holder.pending.clone();
        let alive = holder.alive.clone();
        scoped_effect(move || {
            on_unmount(move || {
                alive.set(false);
                if let Some(h) = pending.borrow_mut().take() {
                    timer::cancel(h);
                }
            })
        });
    }

    (*holder).clone()
}

impl<T: Clone + 'static> DebouncedState<T> {
    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn signal(&self) -> Signal<T> {
        self.value.clone()
    }

    /// Schedules `v` to land after the quiet period, replacing any update
    /// still pending from an earlier call.
    pub fn set(&self, v: T) {
        if !self.alive.get() {
            return;
        }
        if let Some(h) = self.pending.borrow_mut().take() {
            timer::cancel(h);
        }

        let value = self.value.clone();
        let pending = self.pending.clone();
        let mut slot = Some(v);
        let handle = timer::schedule_once(self.quiet, move || {
            *pending.borrow_mut() = None;
            if let Some(v) = slot.take() {
                value.set(v);
            }
        });
        *self.pending.borrow_mut() = Some(handle);
    }

    /// Applies `v` immediately and drops any pending update.
    pub fn set_now(&self, v: T) {
        if !self.alive.get() {
            return;
        }
        if let Some(h) = self.pending.borrow_mut().take() {
            timer::cancel(h);
        }
        self.value.set(v);
    }
}
