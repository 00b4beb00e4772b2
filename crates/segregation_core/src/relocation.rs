//! Moving unhappy agents to a uniformly chosen empty cell.
//!
//! A move clears the source cell and fills the destination, so population
//! counts never change. Relocations mutate shared grid state and must run
//! one at a time.

use crate::error::{Result, SimError};
use crate::grid::Grid;
use rand::Rng;
use segregation_data::{Cell, Position};

/// What happened to a single agent asked to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationOutcome {
    Moved { from: Position, to: Position },
    /// No empty cell exists. The agent stays put and is retried next step.
    Stuck,
}

impl RelocationOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, RelocationOutcome::Moved { .. })
    }
}

/// The current set of empty cells, kept in sync across a batch of moves.
///
/// Each move consumes one empty cell and frees another, so the freed source
/// takes the destination's slot. Selection stays uniform over whatever is
/// empty at the moment of the draw.
#[derive(Debug, Clone, Default)]
pub struct EmptyPool {
    cells: Vec<Position>,
}

impl EmptyPool {
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            cells: grid.empty_positions(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.cells
    }
}

/// Moves the agent at `from` using `pool` for the destination draw.
///
/// `from` must hold an agent and `pool` must mirror the grid's empty cells.
pub(crate) fn move_agent<R: Rng + ?Sized>(
    grid: &mut Grid,
    from: Position,
    pool: &mut EmptyPool,
    rng: &mut R,
) -> RelocationOutcome {
    if pool.cells.is_empty() {
        return RelocationOutcome::Stuck;
    }
    let slot = rng.gen_range(0..pool.cells.len());
    let to = pool.cells[slot];
    let agent = grid.cell(from);
    grid.put(to, agent);
    grid.put(from, Cell::Empty);
    pool.cells[slot] = from;
    RelocationOutcome::Moved { from, to }
}

/// Relocates the agent at `pos` into a uniformly random empty cell.
///
/// Returns [`RelocationOutcome::Stuck`] rather than an error when the grid
/// is full.
pub fn relocate<R: Rng + ?Sized>(
    grid: &mut Grid,
    pos: Position,
    rng: &mut R,
) -> Result<RelocationOutcome> {
    if grid.get(pos)?.is_empty() {
        return Err(SimError::UnoccupiedCell(pos));
    }
    let mut pool = EmptyPool::from_grid(grid);
    Ok(move_agent(grid, pos, &mut pool, rng))
}

/// Like [`relocate`] but reports a full grid as an error.
pub fn try_relocate<R: Rng + ?Sized>(
    grid: &mut Grid,
    pos: Position,
    rng: &mut R,
) -> Result<(Position, Position)> {
    match relocate(grid, pos, rng)? {
        RelocationOutcome::Moved { from, to } => Ok((from, to)),
        RelocationOutcome::Stuck => Err(SimError::NoEmptyCellAvailable),
    }
}
