//! Plain data types shared by the simulation core and its visualizers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Occupancy state of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No occupant. Always happy, always a valid relocation target.
    #[default]
    Empty,
    /// Agent of the first population.
    TypeA,
    /// Agent of the second population.
    TypeB,
}

impl Cell {
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[inline]
    pub fn is_occupied(self) -> bool {
        self != Cell::Empty
    }

    /// Single-character glyph used by text renderers and debug dumps.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::TypeA => 'A',
            Cell::TypeB => 'B',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'A' | 'a' => Some(Cell::TypeA),
            'B' | 'b' => Some(Cell::TypeB),
            _ => None,
        }
    }
}

/// A `(row, col)` coordinate on the grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Number of cells holding each value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub empty: usize,
    pub type_a: usize,
    pub type_b: usize,
}

impl PopulationCounts {
    pub fn agents(&self) -> usize {
        self.type_a + self.type_b
    }

    pub fn total(&self) -> usize {
        self.empty + self.agents()
    }

    pub fn record(&mut self, cell: Cell) {
        match cell {
            Cell::Empty => self.empty += 1,
            Cell::TypeA => self.type_a += 1,
            Cell::TypeB => self.type_b += 1,
        }
    }

    pub fn of(&self, cell: Cell) -> usize {
        match cell {
            Cell::Empty => self.empty,
            Cell::TypeA => self.type_a,
            Cell::TypeB => self.type_b,
        }
    }
}

impl FromIterator<Cell> for PopulationCounts {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut counts = Self::default();
        for cell in iter {
            counts.record(cell);
        }
        counts
    }
}
