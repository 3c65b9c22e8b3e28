use mosaic_core::{remember, signal};

/// Returns a zero-argument closure that forces the owning view to recompose
/// on the host's next scheduling opportunity.
///
/// Backed by a remembered counter that is incremented and never read; the
/// write is what requests the frame.
pub fn use_force_update() -> impl Fn() + Clone {
    let tick = remember(|| signal(0u64));
    let tick = (*tick).clone();
    move || tick.update(|n| *n = n.wrapping_add(1))
}
