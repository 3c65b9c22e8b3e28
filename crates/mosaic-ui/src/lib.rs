#![allow(non_snake_case)]
//! UI-layer utilities: async-state tracking, debounced state, forced
//! re-render, a periodic-callback component, and grid mutation helpers.

pub mod async_state;
pub mod debounce;
pub mod force_update;
pub mod grid;
pub mod interval;

pub mod tests;

pub use async_state::{AsyncPatch, AsyncState, AsyncStatus, UseAsync, use_async, use_async_with};
pub use debounce::{
    DEFAULT_QUIET_PERIOD, DebouncedState, use_debounced_state, use_debounced_state_with,
};
pub use force_update::use_force_update;
pub use grid::{CELL_MAX, CellRef, Grid, REGEN_PROBABILITY, regenerate_all, regenerate_cell};
pub use interval::Interval;
