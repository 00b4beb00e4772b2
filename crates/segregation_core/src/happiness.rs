//! Happiness predicate over the Moore neighbourhood.
//!
//! Only occupied neighbours count: empty cells are excluded from both the
//! numerator and the denominator of the similarity fraction. Evaluation is a
//! pure read of the grid, so a batch of positions can be scored on worker
//! threads as long as nothing mutates the grid meanwhile.

use crate::config::{SimConfig, Topology};
use crate::error::Result;
use crate::grid::Grid;
use segregation_data::{Cell, Position};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Below this many agents the thread-pool overhead outweighs the work.
pub const PARALLEL_MIN_AGENTS: usize = 4096;

/// Threshold and neighbourhood shape an agent is judged by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HappinessRule {
    pub similarity_threshold: f64,
    pub topology: Topology,
}

impl HappinessRule {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
            topology: Topology::Bounded,
        }
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            similarity_threshold: config.happiness.similarity_threshold,
            topology: config.grid.topology,
        }
    }
}

/// How a batch of happiness checks is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    #[default]
    Serial,
    /// Fan out across the rayon pool for large batches. Results keep input
    /// order, so the outcome is identical to `Serial`.
    Parallel,
}

impl EvaluationMode {
    pub fn from_config(config: &SimConfig) -> Self {
        if config.run.parallel_evaluation {
            Self::Parallel
        } else {
            Self::Serial
        }
    }
}

/// Occupied-neighbour counts around one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborTally {
    pub similar: usize,
    pub occupied: usize,
}

impl NeighborTally {
    /// `None` when there are no occupied neighbours.
    pub fn similar_fraction(&self) -> Option<f64> {
        if self.occupied == 0 {
            None
        } else {
            Some(self.similar as f64 / self.occupied as f64)
        }
    }
}

pub(crate) fn tally_of(grid: &Grid, pos: Position, topology: Topology) -> NeighborTally {
    let agent = grid.cell(pos);
    let mut tally = NeighborTally::default();
    for &n in grid.neighbors_of(pos, topology).as_slice() {
        let neighbor = grid.cell(n);
        if neighbor.is_occupied() {
            tally.occupied += 1;
            if neighbor == agent {
                tally.similar += 1;
            }
        }
    }
    tally
}

pub(crate) fn happy_at(grid: &Grid, pos: Position, rule: &HappinessRule) -> bool {
    if grid.cell(pos) == Cell::Empty {
        return true;
    }
    match tally_of(grid, pos, rule.topology).similar_fraction() {
        None => true,
        Some(fraction) => fraction >= rule.similarity_threshold,
    }
}

/// Counts the occupied and same-type neighbours of the cell at `pos`.
pub fn tally(grid: &Grid, pos: Position, topology: Topology) -> Result<NeighborTally> {
    grid.get(pos)?;
    Ok(tally_of(grid, pos, topology))
}

/// Whether the occupant of `pos` is satisfied with its neighbourhood.
///
/// Empty cells and agents without occupied neighbours are always happy.
/// Otherwise the agent is happy iff its same-type fraction is at least the
/// threshold (inclusive).
pub fn is_happy(grid: &Grid, pos: Position, rule: &HappinessRule) -> Result<bool> {
    grid.get(pos)?;
    Ok(happy_at(grid, pos, rule))
}

/// Filters `positions` down to the agents that are unhappy, preserving order.
pub(crate) fn unhappy_among(
    grid: &Grid,
    positions: &[Position],
    rule: &HappinessRule,
    mode: EvaluationMode,
) -> Vec<Position> {
    #[cfg(feature = "rayon")]
    {
        if mode == EvaluationMode::Parallel && positions.len() >= PARALLEL_MIN_AGENTS {
            return positions
                .par_iter()
                .copied()
                .filter(|&p| !happy_at(grid, p, rule))
                .collect();
        }
    }
    #[cfg(not(feature = "rayon"))]
    let _ = mode;

    positions
        .iter()
        .copied()
        .filter(|&p| !happy_at(grid, p, rule))
        .collect()
}

/// All currently unhappy agents, in row-major order.
pub fn unhappy_agents(grid: &Grid, rule: &HappinessRule, mode: EvaluationMode) -> Vec<Position> {
    unhappy_among(grid, &grid.occupied_positions(), rule, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_empty_cell_always_happy() {
        let grid = Grid::from_rows(&["AAA", "A.B", "BBB"]).unwrap();
        for threshold in [0.0, 0.5, 1.0] {
            assert!(is_happy(&grid, p(1, 1), &HappinessRule::new(threshold)).unwrap());
        }
    }

    #[test]
    fn test_isolated_agent_is_happy() {
        let grid = Grid::from_rows(&["...", ".A.", "..."]).unwrap();
        assert!(is_happy(&grid, p(1, 1), &HappinessRule::new(1.0)).unwrap());
        assert_eq!(tally(&grid, p(1, 1), Topology::Bounded).unwrap().occupied, 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // centre A sees A, A, B, B among occupied neighbours
        let grid = Grid::from_rows(&["A.A", ".A.", "B.B"]).unwrap();
        let t = tally(&grid, p(1, 1), Topology::Bounded).unwrap();
        assert_eq!(t, NeighborTally { similar: 2, occupied: 4 });
        assert!(is_happy(&grid, p(1, 1), &HappinessRule::new(0.5)).unwrap());
        assert!(!is_happy(&grid, p(1, 1), &HappinessRule::new(0.51)).unwrap());
    }

    #[test]
    fn test_empty_neighbors_excluded_from_denominator() {
        // one occupied neighbour, same type: fraction 1.0 despite 7 empties
        let grid = Grid::from_rows(&["A..", ".A.", "..."]).unwrap();
        assert!(is_happy(&grid, p(1, 1), &HappinessRule::new(1.0)).unwrap());
    }

    #[test]
    fn test_zero_threshold_everyone_happy() {
        let grid = Grid::from_rows(&["ABA", "BAB", "ABA"]).unwrap();
        let rule = HappinessRule::new(0.0);
        assert!(unhappy_agents(&grid, &rule, EvaluationMode::Serial).is_empty());
    }

    #[test]
    fn test_bounded_edges_do_not_wrap() {
        // with wrapping, (0,0) would see the B in the far corner
        let grid = Grid::from_rows(&["A..", "...", "..B"]).unwrap();
        let rule = HappinessRule::new(1.0);
        assert!(is_happy(&grid, p(0, 0), &rule).unwrap());
        let toroidal = rule.with_topology(Topology::Toroidal);
        assert!(!is_happy(&grid, p(0, 0), &toroidal).unwrap());
    }

    #[test]
    fn test_unhappy_agents_row_major() {
        let grid = Grid::from_rows(&["AB.", "BA.", "..."]).unwrap();
        let rule = HappinessRule::new(0.6);
        let unhappy = unhappy_agents(&grid, &rule, EvaluationMode::Serial);
        assert_eq!(unhappy, vec![p(0, 0), p(0, 1), p(1, 0), p(1, 1)]);
    }

    #[test]
    fn test_parallel_matches_serial() {
        use crate::population::populate;
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        let config = SimConfig::new(80, 0.1, 0.5);
        let grid = populate(&config, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let rule = HappinessRule::from_config(&config);
        assert_eq!(
            unhappy_agents(&grid, &rule, EvaluationMode::Serial),
            unhappy_agents(&grid, &rule, EvaluationMode::Parallel)
        );
    }

    #[test]
    fn test_invalid_position() {
        let grid = Grid::new(3);
        assert!(is_happy(&grid, p(3, 3), &HappinessRule::new(0.5)).is_err());
    }
}
