//! Population sizing and unbiased random placement.

use crate::config::{RemainderPolicy, SimConfig};
use crate::error::Result;
use crate::grid::Grid;
use rand::seq::SliceRandom;
use rand::Rng;
use segregation_data::{Cell, PopulationCounts, Position};

/// Computes how many cells of each kind a fresh grid receives.
///
/// `empty = floor(N² * empty_ratio)`, the remaining agents are split in
/// half and an odd agent is placed according to `remainder`. The three
/// counts always sum to `N²`.
pub fn plan_population(
    size: usize,
    empty_ratio: f64,
    remainder: RemainderPolicy,
) -> PopulationCounts {
    let cells = size * size;
    let empty = ((cells as f64 * empty_ratio).floor() as usize).min(cells);
    let agents = cells - empty;
    let half = agents / 2;
    let odd = agents % 2;

    match remainder {
        RemainderPolicy::ExtraToTypeA => PopulationCounts {
            empty,
            type_a: half + odd,
            type_b: half,
        },
        RemainderPolicy::ExtraToTypeB => PopulationCounts {
            empty,
            type_a: half,
            type_b: half + odd,
        },
        RemainderPolicy::ExtraToEmpty => PopulationCounts {
            empty: empty + odd,
            type_a: half,
            type_b: half,
        },
    }
}

/// Builds a populated grid for `config`.
///
/// All `N²` coordinates are shuffled without replacement; TypeA takes the
/// first slots of the permutation, TypeB the next, and the rest stay empty.
pub fn populate<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Result<Grid> {
    config.validate()?;

    let size = config.grid.size;
    let plan = plan_population(
        size,
        config.population.empty_ratio,
        config.population.remainder,
    );

    let mut positions: Vec<Position> = (0..size)
        .flat_map(|row| (0..size).map(move |col| Position::new(row, col)))
        .collect();
    positions.shuffle(rng);

    let mut grid = Grid::new(size);
    let mut slots = positions.into_iter();
    for pos in slots.by_ref().take(plan.type_a) {
        grid.put(pos, Cell::TypeA);
    }
    for pos in slots.take(plan.type_b) {
        grid.put(pos, Cell::TypeB);
    }

    tracing::debug!(
        size,
        type_a = plan.type_a,
        type_b = plan.type_b,
        empty = plan.empty,
        "Grid populated"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_plan_even_split() {
        let plan = plan_population(10, 0.2, RemainderPolicy::ExtraToTypeA);
        assert_eq!(plan.empty, 20);
        assert_eq!(plan.type_a, 40);
        assert_eq!(plan.type_b, 40);
    }

    #[test]
    fn test_plan_remainder_policies() {
        // 3x3 with ratio 0.12 -> 1 empty, 8 agents: even
        // 3x3 with ratio 0.0 -> 0 empty, 9 agents: odd
        let a = plan_population(3, 0.0, RemainderPolicy::ExtraToTypeA);
        assert_eq!((a.empty, a.type_a, a.type_b), (0, 5, 4));

        let b = plan_population(3, 0.0, RemainderPolicy::ExtraToTypeB);
        assert_eq!((b.empty, b.type_a, b.type_b), (0, 4, 5));

        let e = plan_population(3, 0.0, RemainderPolicy::ExtraToEmpty);
        assert_eq!((e.empty, e.type_a, e.type_b), (1, 4, 4));

        for plan in [a, b, e] {
            assert_eq!(plan.total(), 9);
        }
    }

    #[test]
    fn test_plan_floors_empty_count() {
        let plan = plan_population(3, 0.12, RemainderPolicy::ExtraToTypeA);
        assert_eq!(plan.empty, 1);
        assert_eq!(plan.agents(), 8);
    }

    #[test]
    fn test_populate_matches_plan() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = SimConfig::new(25, 0.2, 0.5);
        let grid = populate(&config, &mut rng).unwrap();
        let plan = plan_population(25, 0.2, RemainderPolicy::ExtraToTypeA);
        assert_eq!(grid.counts(), plan);
    }

    #[test]
    fn test_populate_is_seed_deterministic() {
        let config = SimConfig::new(12, 0.3, 0.5);
        let a = populate(&config, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let b = populate(&config, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let c = populate(&config, &mut ChaCha8Rng::seed_from_u64(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_populate_rejects_invalid_config() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = SimConfig::new(5, 1.0, 0.5);
        assert!(matches!(
            populate(&config, &mut rng),
            Err(SimError::InvalidConfiguration(_))
        ));
    }
}
