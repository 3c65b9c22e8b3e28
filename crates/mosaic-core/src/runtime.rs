use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::scope::Scope;

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
    static FRAME_REQUESTED: Cell<bool> = const { Cell::new(false) };
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// Marks the composition dirty; the host should recompose on its next tick.
pub fn request_frame() {
    FRAME_REQUESTED.with(|f| f.set(true));
}

/// Takes the dirty flag, clearing it. Returns whether a frame was requested
/// since the last call.
pub fn take_frame_request() -> bool {
    FRAME_REQUESTED.with(|f| f.replace(false))
}

/// Drops all remembered slots. The next frame composes from scratch.
pub fn reset_composition() {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        c.slots.clear();
        c.keyed_slots.clear();
        c.cursor = 0;
    });
    FRAME_REQUESTED.with(|f| f.set(false));
}

/// A live view tree: slot storage plus the lifecycle scope that owns every
/// effect composed inside it. One `Composition` per host window/test.
pub struct Composition {
    root: Scope,
}

impl Composition {
    /// Starts a fresh composition, dropping any slots a previous one left in
    /// this thread.
    pub fn new() -> Self {
        reset_composition();
        Self { root: Scope::new() }
    }

    pub fn scope(&self) -> &Scope {
        &self.root
    }

    /// Composes one frame: resets the slot cursor and runs `f` under the root
    /// scope, so `remember` slots line up call-site by call-site with the
    /// previous frame.
    pub fn frame<R>(&mut self, f: impl FnOnce() -> R) -> R {
        COMPOSER.with(|c| {
            c.borrow_mut().cursor = 0;
        });
        self.root.run(f)
    }

    /// Tears the view tree down: runs every scoped cleanup, then drops the
    /// slots.
    pub fn dispose(self) {
        self.root.dispose();
        reset_composition();
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            // replace (else panics)
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                cursor
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let key = key.into();

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            } else {
                log::warn!(
                    "remember_with_key: key '{}' reused with a different type; replacing.",
                    key
                );
            }
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

pub fn remember_state_with_key<T: 'static>(
    key: impl Into<String>,
    init: impl FnOnce() -> T,
) -> Rc<RefCell<T>> {
    remember_with_key(key, || RefCell::new(init()))
}
