pub use crate::clock::{Clock, SystemClock, TestClock, set_clock};
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::effects_ext::{disposable_effect, side_effect};
pub use crate::error::HookError;
pub use crate::promise::{Promise, PromiseState, promise};
pub use crate::runtime::{
    Composition, remember, remember_state, remember_state_with_key, remember_with_key,
    request_frame, reset_composition, take_frame_request,
};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::signal::{Signal, signal};
pub use crate::timer::{TimerHandle, cancel, pump, schedule, schedule_once};
