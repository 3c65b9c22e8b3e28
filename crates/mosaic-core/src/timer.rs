//! Cooperative timer service.
//!
//! Timers live in a thread-local registry keyed by slotmap handles. The host
//! loop calls [`pump`] once per tick; every timer whose deadline has passed
//! fires at most once per pump, repeating timers are re-armed from their old
//! deadline (not from "now"), and one-shots are removed after firing. A
//! zero-period timer is due on every pump.
//!
//! Callbacks may freely schedule and cancel timers; timers scheduled from
//! inside a callback never fire in the same pump, and a timer cancelled from
//! inside a callback no longer fires.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

use crate::clock;
use crate::runtime::request_frame;

new_key_type! {
    struct TimerKey;
}

/// Cancellation handle returned by [`schedule`] and [`schedule_once`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimerHandle(TimerKey);

struct TimerEntry {
    deadline: Instant,
    period: Option<Duration>,
    callback: Rc<RefCell<dyn FnMut()>>,
}

thread_local! {
    static TIMERS: RefCell<SlotMap<TimerKey, TimerEntry>> = RefCell::new(SlotMap::with_key());
}

/// Schedules `callback` to fire every `every`, starting one period from now.
pub fn schedule(every: Duration, callback: impl FnMut() + 'static) -> TimerHandle {
    insert(clock::now() + every, Some(every), callback)
}

/// Schedules `callback` to fire once, `delay` from now.
pub fn schedule_once(delay: Duration, callback: impl FnMut() + 'static) -> TimerHandle {
    insert(clock::now() + delay, None, callback)
}

fn insert(
    deadline: Instant,
    period: Option<Duration>,
    callback: impl FnMut() + 'static,
) -> TimerHandle {
    TIMERS.with(|t| {
        let key = t.borrow_mut().insert(TimerEntry {
            deadline,
            period,
            callback: Rc::new(RefCell::new(callback)),
        });
        TimerHandle(key)
    })
}

/// Cancels a timer. Idempotent; unknown handles are a no-op.
pub fn cancel(handle: TimerHandle) {
    TIMERS.with(|t| {
        t.borrow_mut().remove(handle.0);
    });
}

/// Number of live timers in this thread. Mostly useful in tests.
pub fn active_timers() -> usize {
    TIMERS.with(|t| t.borrow().len())
}

/// Fires every due timer. The host calls this once per tick.
pub fn pump() {
    let now = clock::now();

    // Snapshot due timers first so callbacks can touch the registry, and so
    // timers scheduled from inside a callback wait for the next pump.
    let mut due: Vec<(TimerKey, Instant, Rc<RefCell<dyn FnMut()>>, bool)> = TIMERS.with(|t| {
        let mut t = t.borrow_mut();
        let mut due = Vec::new();
        for (key, entry) in t.iter_mut() {
            if entry.deadline > now {
                continue;
            }
            due.push((
                key,
                entry.deadline,
                entry.callback.clone(),
                entry.period.is_none(),
            ));
            if let Some(period) = entry.period {
                if period.is_zero() {
                    // A zero period cannot advance the deadline; the timer
                    // fires once per pump.
                    entry.deadline = now;
                } else {
                    // Re-arm from the old deadline; skip missed periods
                    // instead of firing a backlog.
                    while entry.deadline <= now {
                        entry.deadline += period;
                    }
                }
            }
        }
        due
    });

    if due.is_empty() {
        return;
    }
    due.sort_by_key(|(_, deadline, _, _)| *deadline);

    for (key, _, callback, one_shot) in due {
        // Skip timers cancelled earlier in this same pump.
        let live = TIMERS.with(|t| t.borrow().contains_key(key));
        if !live {
            continue;
        }
        (callback.borrow_mut())();
        if one_shot {
            TIMERS.with(|t| {
                t.borrow_mut().remove(key);
            });
        }
    }

    request_frame();
}
