use mosaic_core::timer;
use mosaic_core::{Dispose, disposable_effect};
use web_time::Duration;

/// Declarative periodic callback: fires `callback` every `every` while the
/// owning view stays composed. No rendered output.
///
/// Keyed on the interval value: recomposing with the same interval leaves the
/// running timer alone; a changed interval cancels and reschedules; disposal
/// of the owning scope cancels outright.
pub fn Interval(every: Duration, callback: impl FnMut() + 'static) {
    disposable_effect(every, move || {
        let handle = timer::schedule(every, callback);
        Dispose::new(move || timer::cancel(handle))
    });
}
