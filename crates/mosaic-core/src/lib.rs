//! # Signals, composition slots, and effects
//!
//! Mosaic's substrate is a small single-threaded reactive core. The UI-layer
//! utilities in `mosaic-ui` are built from four pieces:
//!
//! - `Signal<T>` — observable state cell with a merge-style `update`.
//! - `remember*` — slot storage bound to the composition, so a call-site keeps
//!   its state across recompositions.
//! - `effect` / `scoped_effect` / `disposable_effect` — side-effects with
//!   cleanup tied to the owning [`Scope`].
//! - `clock` + `timer` — a pluggable clock and a cooperative timer service
//!   pumped once per host tick.
//!
//! ## Signals
//!
//! `Signal<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use mosaic_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! Every write requests a new frame, so a headless host knows when to
//! recompose (see [`take_frame_request`]).
//!
//! ## Remembered state
//!
//! State lives in `remember_*` slots rather than globals:
//!
//! ```rust
//! use mosaic_core::*;
//!
//! let mut comp = Composition::new();
//! let count = comp.frame(|| remember(|| signal(0i32)));
//! count.update(|c| *c += 1);
//! ```
//!
//! - `remember` and `remember_state` are order-based: the Nth call in a frame
//!   always refers to the Nth stored value.
//! - `remember_with_key` and `remember_state_with_key` are key-based and more
//!   stable across conditional branches.
//!
//! ## Effects and cleanup
//!
//! ```rust
//! use mosaic_core::*;
//!
//! let mut comp = Composition::new();
//! comp.frame(|| {
//!     scoped_effect(|| {
//!         log::info!("mounted");
//!         on_unmount(|| log::info!("unmounted"))
//!     });
//! });
//! comp.dispose(); // runs the unmount cleanup
//! ```
//!
//! Long-running work (timers, deferred operations) should hang off a scope
//! this way so everything is cancelled when the UI that owns it disappears.

pub mod clock;
pub mod effects;
pub mod effects_ext;
pub mod error;
pub mod prelude;
pub mod promise;
pub mod runtime;
pub mod scope;
pub mod signal;
pub mod timer;


pub use effects::*;
pub use effects_ext::*;
pub use error::*;
pub use prelude::*;
pub use promise::*;
pub use runtime::*;
pub use scope::*;
pub use signal::*;
