use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::{Duration, Instant};

/// Time source for timers. Installed per thread so tests stay deterministic
/// and isolated from each other.
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

thread_local! {
    static CLOCK: RefCell<Rc<dyn Clock>> = RefCell::new(Rc::new(SystemClock));
}

/// Install a clock for this thread. The platform installs `SystemClock`;
/// tests install a `TestClock` they drive by hand.
pub fn set_clock(clock: Rc<dyn Clock>) {
    CLOCK.with(|c| *c.borrow_mut() = clock);
}

pub fn now() -> Instant {
    CLOCK.with(|c| c.borrow().now())
}

/// A test clock you can drive deterministically.
#[derive(Clone)]
pub struct TestClock(Rc<Cell<Instant>>);

impl TestClock {
    pub fn starting_now() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    pub fn start_at(t: Instant) -> Self {
        Self(Rc::new(Cell::new(t)))
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }

    pub fn set(&self, t: Instant) {
        self.0.set(t);
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}
