pub mod macros;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use segregation_lib::sim::{Grid, SimConfig, Simulation, Topology};

#[allow(dead_code)]
pub struct SimBuilder {
    config: SimConfig,
    rows: Option<Vec<String>>,
    seed: u64,
}

#[allow(dead_code)]
impl SimBuilder {
    pub fn new() -> Self {
        let mut config = SimConfig::default();
        config.run.seed = Some(0);
        Self {
            config,
            rows: None,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.config.run.seed = Some(seed);
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.config.grid.size = size;
        self
    }

    pub fn with_empty_ratio(mut self, ratio: f64) -> Self {
        self.config.population.empty_ratio = ratio;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.config.happiness.similarity_threshold = threshold;
        self
    }

    pub fn toroidal(mut self) -> Self {
        self.config.grid.topology = Topology::Toroidal;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut SimConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Uses a hand-drawn layout instead of a random population.
    pub fn with_rows(mut self, rows: &[&str]) -> Self {
        self.config.grid.size = rows.len();
        self.rows = Some(rows.iter().map(|r| r.to_string()).collect());
        self
    }

    pub fn build(self) -> Simulation {
        match self.rows {
            Some(rows) => {
                let grid = Grid::from_rows(&rows).expect("Fixture rows must form a square grid");
                Simulation::with_grid(self.config, grid, ChaCha8Rng::seed_from_u64(self.seed))
                    .expect("Fixture config must be valid")
            }
            None => Simulation::new(self.config).expect("Failed to create simulation"),
        }
    }
}
