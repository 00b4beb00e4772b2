use crate::controller::StepReport;
use crate::grid::Grid;
use segregation_data::{Cell, PopulationCounts, Position};
use serde::{Deserialize, Serialize};

/// Immutable copy of the grid handed to renderers and exporters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GridSnapshot {
    /// Steps completed when the snapshot was taken; 0 is the initial layout.
    pub step: u64,
    pub size: usize,
    /// Row-major cell values.
    pub cells: Vec<Cell>,
    pub counts: PopulationCounts,
    /// Report of the step that produced this state, if any.
    pub last_step: Option<StepReport>,
}

impl GridSnapshot {
    pub fn capture(grid: &Grid, step: u64, last_step: Option<StepReport>) -> Self {
        Self {
            step,
            size: grid.size(),
            cells: grid.cells().to_vec(),
            counts: grid.counts(),
            last_step,
        }
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        if pos.row < self.size && pos.col < self.size {
            self.cells.get(pos.row * self.size + pos.col).copied()
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.max(1))
    }
}
