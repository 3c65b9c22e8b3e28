//! Headless grid demo: a remembered grid signal, an `Interval` that
//! regenerates a random 30% of the cells twice a second, and a slower one
//! that rerolls a single targeted cell. Frames are rendered to the log.

use mosaic_core::prelude::*;
use mosaic_core::timer;
use mosaic_ui::{CellRef, Grid, Interval, regenerate_all, regenerate_cell};
use rand::Rng;
use web_time::Duration;

const ROWS: usize = 4;
const COLUMNS: usize = 6;

/// Three virtual seconds, 50 ms per tick.
const TICK: Duration = Duration::from_millis(50);
const TICKS: u32 = 60;

fn board() {
    let grid = remember(|| signal(Grid::random(ROWS, COLUMNS, &mut rand::rng())));

    Interval(Duration::from_millis(500), {
        let grid = grid.clone();
        move || {
            let next = regenerate_all(&grid.get(), &mut rand::rng());
            grid.set(next);
        }
    });

    Interval(Duration::from_millis(1300), {
        let grid = grid.clone();
        move || {
            let cell = CellRef {
                row: rand::rng().random_range(0..ROWS),
                column: rand::rng().random_range(0..COLUMNS),
            };
            let next = regenerate_cell(&grid.get(), cell, &mut rand::rng());
            grid.set(next);
        }
    });

    for (i, row) in grid.get().as_rows().iter().enumerate() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:5.1}")).collect();
        log::info!("row {i}: [{}]", line.join(", "));
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Virtual time: the demo drives the clock by hand, so every run produces
    // the same tick sequence.
    let clock = TestClock::starting_now();
    set_clock(std::rc::Rc::new(clock.clone()));

    let mut composition = Composition::new();
    composition.frame(board);

    for _ in 0..TICKS {
        clock.advance(TICK);
        timer::pump();
        if take_frame_request() {
            composition.frame(board);
        }
    }

    composition.dispose();
    Ok(())
}
