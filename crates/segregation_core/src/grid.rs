//! Fixed-size square store of cell occupancy.
//!
//! The grid is allocated once and only ever mutated in place. Every access
//! is bounds-checked; an out-of-range coordinate is reported as
//! [`SimError::InvalidPosition`] and never clamped.

use crate::config::Topology;
use crate::error::{Result, SimError};
use segregation_data::{Cell, PopulationCounts, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row/column offsets of the eight Moore neighbours.
const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an `size x size` grid with every cell empty.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Builds a grid from rows of cell symbols (`.`, `A`, `B`).
    ///
    /// Intended for tests and fixtures; rows must form a square.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let before = cells.len();
            for c in row.chars() {
                let cell = Cell::from_symbol(c).ok_or_else(|| {
                    SimError::invalid_config(format!("unknown cell symbol {c:?} in row {r}"))
                })?;
                cells.push(cell);
            }
            if cells.len() - before != size {
                return Err(SimError::invalid_config(format!(
                    "row {r} has {} cells, expected {size}",
                    cells.len() - before
                )));
            }
        }
        Ok(Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells, `N²`.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    #[inline]
    fn index(&self, pos: Position) -> Result<usize> {
        if self.contains(pos) {
            Ok(pos.row * self.size + pos.col)
        } else {
            Err(SimError::invalid_position(pos, self.size))
        }
    }

    #[inline]
    fn position_of(&self, idx: usize) -> Position {
        Position::new(idx / self.size, idx % self.size)
    }

    /// Unchecked read for positions the core itself produced.
    #[inline]
    pub(crate) fn cell(&self, pos: Position) -> Cell {
        self.cells[pos.row * self.size + pos.col]
    }

    #[inline]
    pub(crate) fn put(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.row * self.size + pos.col] = cell;
    }

    pub fn get(&self, pos: Position) -> Result<Cell> {
        Ok(self.cells[self.index(pos)?])
    }

    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<()> {
        let idx = self.index(pos)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks(0) panics, and a zero-sized grid has no rows anyway
        self.cells.chunks(self.size.max(1))
    }

    /// All positions holding `value`, in row-major order.
    pub fn positions_of(&self, value: Cell) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == value)
            .map(|(i, _)| self.position_of(i))
            .collect()
    }

    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions_of(Cell::Empty)
    }

    /// All positions holding an agent of either type, in row-major order.
    pub fn occupied_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_occupied())
            .map(|(i, _)| self.position_of(i))
            .collect()
    }

    pub fn counts(&self) -> PopulationCounts {
        self.cells.iter().copied().collect()
    }

    /// Distinct Moore neighbours of `pos` under `topology`.
    ///
    /// Bounded grids clip at the edges. Toroidal grids wrap; on grids
    /// smaller than 3x3 wrapped offsets can collide, so duplicates and the
    /// centre cell itself are dropped.
    pub fn neighbors(&self, pos: Position, topology: Topology) -> Result<Neighborhood> {
        self.index(pos)?;
        Ok(self.neighbors_of(pos, topology))
    }

    pub(crate) fn neighbors_of(&self, pos: Position, topology: Topology) -> Neighborhood {
        let n = self.size as isize;
        let mut hood = Neighborhood::default();
        for (dr, dc) in MOORE_OFFSETS {
            let r = pos.row as isize + dr;
            let c = pos.col as isize + dc;
            let candidate = match topology {
                Topology::Bounded => {
                    if r < 0 || r >= n || c < 0 || c >= n {
                        continue;
                    }
                    Position::new(r as usize, c as usize)
                }
                Topology::Toroidal => {
                    let p = Position::new(r.rem_euclid(n) as usize, c.rem_euclid(n) as usize);
                    if p == pos || hood.as_slice().contains(&p) {
                        continue;
                    }
                    p
                }
            };
            hood.push(candidate);
        }
        hood
    }
}

/// Up to eight neighbour positions, stored inline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighborhood {
    positions: [Position; 8],
    len: usize,
}

impl Neighborhood {
    fn push(&mut self, pos: Position) {
        self.positions[self.len] = pos;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.positions[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
