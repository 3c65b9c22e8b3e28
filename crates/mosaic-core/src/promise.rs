use std::cell::RefCell;
use std::rc::Rc;

/// Settlement state of a [`Promise`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PromiseState {
    Pending,
    Resolved,
    Rejected,
}

/// Single-threaded deferred value with success/failure continuations.
///
/// A promise settles at most once; the first `resolve`/`reject` wins and
/// later settlements are ignored. Continuations registered while pending run
/// synchronously at settlement, on the settling call stack. Continuations
/// registered after settlement run immediately.
pub struct Promise<T: 'static, E: 'static>(Rc<RefCell<Inner<T, E>>>);

enum Settled<T, E> {
    Pending,
    Resolved(T),
    Rejected(E),
}

struct Inner<T, E> {
    settled: Settled<T, E>,
    on_ok: Vec<Box<dyn FnOnce(&T)>>,
    on_err: Vec<Box<dyn FnOnce(&E)>>,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Promise<T, E> {
    pub fn pending() -> Self {
        Self(Rc::new(RefCell::new(Inner {
            settled: Settled::Pending,
            on_ok: Vec::new(),
            on_err: Vec::new(),
        })))
    }

    pub fn resolved(value: T) -> Self {
        let p = Self::pending();
        p.resolve(value);
        p
    }

    pub fn rejected(reason: E) -> Self {
        let p = Self::pending();
        p.reject(reason);
        p
    }

    pub fn state(&self) -> PromiseState {
        match self.0.borrow().settled {
            Settled::Pending => PromiseState::Pending,
            Settled::Resolved(_) => PromiseState::Resolved,
            Settled::Rejected(_) => PromiseState::Rejected,
        }
    }

    /// Settles with a value. No-op if already settled.
    pub fn resolve(&self, value: T) {
        let callbacks = {
            let mut inner = self.0.borrow_mut();
            if !matches!(inner.settled, Settled::Pending) {
                return;
            }
            inner.settled = Settled::Resolved(value.clone());
            inner.on_err.clear();
            std::mem::take(&mut inner.on_ok)
        };
        // Borrow released: continuations may re-enter this promise.
        for cb in callbacks {
            cb(&value);
        }
    }

    /// Settles with a failure reason. No-op if already settled.
    pub fn reject(&self, reason: E) {
        let callbacks = {
            let mut inner = self.0.borrow_mut();
            if !matches!(inner.settled, Settled::Pending) {
                return;
            }
            inner.settled = Settled::Rejected(reason.clone());
            inner.on_ok.clear();
            std::mem::take(&mut inner.on_err)
        };
        for cb in callbacks {
            cb(&reason);
        }
    }

    /// Registers continuations and returns a forwarding promise that settles
    /// with the same outcome, so callers can chain.
    pub fn then(
        &self,
        on_ok: impl FnOnce(T) + 'static,
        on_err: impl FnOnce(E) + 'static,
    ) -> Promise<T, E> {
        let forward = Promise::pending();
        let mut on_ok = Some(on_ok);
        let mut on_err = Some(on_err);

        enum Now<T, E> {
            Wait,
            Ok(T),
            Err(E),
        }

        let now = {
            let mut inner = self.0.borrow_mut();
            match &inner.settled {
                Settled::Pending => {
                    if let Some(ok) = on_ok.take() {
                        let fwd = forward.clone();
                        inner.on_ok.push(Box::new(move |v: &T| {
                            ok(v.clone());
                            fwd.resolve(v.clone());
                        }));
                    }
                    if let Some(err) = on_err.take() {
                        let fwd = forward.clone();
                        inner.on_err.push(Box::new(move |e: &E| {
                            err(e.clone());
                            fwd.reject(e.clone());
                        }));
                    }
                    Now::Wait
                }
                Settled::Resolved(v) => Now::Ok(v.clone()),
                Settled::Rejected(e) => Now::Err(e.clone()),
            }
        };

        // Borrow released before any user continuation runs.
        match now {
            Now::Wait => {}
            Now::Ok(v) => {
                if let Some(ok) = on_ok.take() {
                    ok(v.clone());
                }
                forward.resolve(v);
            }
            Now::Err(e) => {
                if let Some(err) = on_err.take() {
                    err(e.clone());
                }
                forward.reject(e);
            }
        }

        forward
    }
}

/// Shorthand for `Promise::pending()`.
pub fn promise<T: Clone + 'static, E: Clone + 'static>() -> Promise<T, E> {
    Promise::pending()
}
