//! Grid mutation helpers.
//!
//! Pure functions over a 2-D matrix of numeric cells. Updates always build a
//! new grid; callers swap the whole value into their state cell rather than
//! mutating in place.

use rand::Rng;

/// Per-cell replacement probability used by [`regenerate_all`].
pub const REGEN_PROBABILITY: f64 = 0.3;

/// Fresh cell values are drawn uniformly from `[0, CELL_MAX)`.
pub const CELL_MAX: f64 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    cells: Vec<Vec<f64>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl Grid {
    /// Fresh `rows x columns` grid with every cell drawn from `[0, CELL_MAX)`.
    pub fn random<R: Rng + ?Sized>(rows: usize, columns: usize, rng: &mut R) -> Self {
        let cells = (0..rows)
            .map(|_| (0..columns).map(|_| fresh_cell(rng)).collect())
            .collect();
        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Cell count of one row; 0 for an out-of-range row index.
    pub fn columns_in(&self, row: usize) -> usize {
        self.cells.get(row).map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(column)).copied()
    }

    pub fn as_rows(&self) -> &[Vec<f64>] {
        &self.cells
    }
}

impl From<Vec<Vec<f64>>> for Grid {
    fn from(cells: Vec<Vec<f64>>) -> Self {
        Self { cells }
    }
}

fn fresh_cell<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(0.0..CELL_MAX)
}

/// New grid where each cell independently has a [`REGEN_PROBABILITY`] chance
/// of being replaced by a fresh value. Deterministic under a seeded `rng`.
pub fn regenerate_all<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Grid {
    let cells = grid
        .cells
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| {
                    if rng.random_bool(REGEN_PROBABILITY) {
                        fresh_cell(rng)
                    } else {
                        v
                    }
                })
                .collect()
        })
        .collect();
    Grid { cells }
}

/// New grid identical to the input except the one cell at `cell`, which gets
/// a fresh value. Out-of-range coordinates return the input unchanged.
pub fn regenerate_cell<R: Rng + ?Sized>(grid: &Grid, cell: CellRef, rng: &mut R) -> Grid {
    let mut next = grid.clone();
    if let Some(v) = next
        .cells
        .get_mut(cell.row)
        .and_then(|r| r.get_mut(cell.column))
    {
        *v = fresh_cell(rng);
    }
    next
}
