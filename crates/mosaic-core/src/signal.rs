use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::request_frame;

pub type SubId = usize;

/// Observable state cell. Cloning shares the underlying value.
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

struct Inner<T> {
    value: T,
    subs: Vec<Box<dyn Fn(&T)>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: Vec::new(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    pub fn set(&self, v: T) {
        {
            let mut inner = self.0.borrow_mut();
            inner.value = v;
            let vref = &inner.value;
            for s in &inner.subs {
                s(vref);
            }
        }
        request_frame();
    }

    /// Merge-style update: mutate in place, then notify.
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        {
            let mut inner = self.0.borrow_mut();
            f(&mut inner.value);
            let vref = &inner.value;
            for s in &inner.subs {
                s(vref);
            }
        }
        request_frame();
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        self.0.borrow_mut().subs.push(Box::new(f));
        self.0.borrow().subs.len() - 1
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
