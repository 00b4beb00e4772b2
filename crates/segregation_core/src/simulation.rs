//! The explicit state object for one run: configuration, grid, random
//! source and counters, with nothing held in module-level state.

use crate::config::SimConfig;
use crate::controller::{drive, step_with_report, RunSummary, StepReport};
use crate::error::{Result, SimError};
use crate::grid::Grid;
use crate::happiness::{EvaluationMode, HappinessRule};
use crate::metrics::Metrics;
use crate::population::populate;
use crate::snapshot::GridSnapshot;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

pub struct Simulation {
    config: SimConfig,
    grid: Grid,
    rng: ChaCha8Rng,
    rule: HappinessRule,
    mode: EvaluationMode,
    steps: u64,
    last_report: Option<StepReport>,
    converged: bool,
    pub metrics: Metrics,
}

fn rng_for(config: &SimConfig) -> ChaCha8Rng {
    match config.run.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

impl Simulation {
    /// Validates `config`, seeds the random source and populates a grid.
    pub fn new(config: SimConfig) -> Result<Self> {
        let mut rng = rng_for(&config);
        let grid = populate(&config, &mut rng)?;
        let counts = grid.counts();
        tracing::info!(
            size = config.grid.size,
            type_a = counts.type_a,
            type_b = counts.type_b,
            empty = counts.empty,
            threshold = config.happiness.similarity_threshold,
            seed = ?config.run.seed,
            fingerprint = %config.fingerprint(),
            "Simulation initialised"
        );
        Ok(Self::assemble(config, grid, rng))
    }

    /// Adopts a caller-built grid, e.g. a fixture or a replayed state.
    pub fn with_grid(config: SimConfig, grid: Grid, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        if grid.size() != config.grid.size {
            return Err(SimError::invalid_config(format!(
                "grid is {0}x{0} but config expects {1}x{1}",
                grid.size(),
                config.grid.size
            )));
        }
        Ok(Self::assemble(config, grid, rng))
    }

    fn assemble(config: SimConfig, grid: Grid, rng: ChaCha8Rng) -> Self {
        Self {
            rule: HappinessRule::from_config(&config),
            mode: EvaluationMode::from_config(&config),
            config,
            grid,
            rng,
            steps: 0,
            last_report: None,
            converged: false,
            metrics: Metrics::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn rule(&self) -> &HappinessRule {
        &self.rule
    }

    /// Steps taken since construction or the last [`Simulation::reset`].
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn last_report(&self) -> Option<StepReport> {
        self.last_report
    }

    /// Whether the most recent step moved nobody.
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(&self.grid, self.steps, self.last_report)
    }

    /// Runs one evaluate-then-relocate pass.
    pub fn step(&mut self) -> StepReport {
        let started = Instant::now();
        let report = step_with_report(&mut self.grid, &self.rule, self.mode, &mut self.rng);
        self.steps += 1;
        self.last_report = Some(report);
        self.converged = !report.moved_any();
        self.metrics.record_step(&report, started.elapsed());
        report
    }

    /// Steps until convergence or until `max_steps` more steps have run.
    pub fn run(&mut self, max_steps: u64) -> RunSummary {
        self.run_with(max_steps, |_| {})
    }

    /// [`Simulation::run`] with a callback after each step.
    pub fn run_with<F>(&mut self, max_steps: u64, mut on_step: F) -> RunSummary
    where
        F: FnMut(&Simulation),
    {
        let summary = drive(max_steps, || {
            let report = self.step();
            on_step(&*self);
            report
        });

        if summary.converged {
            tracing::info!(
                steps = self.steps,
                total_moves = summary.total_moves,
                "Converged: no agent moved"
            );
        } else {
            tracing::info!(
                steps = self.steps,
                total_moves = summary.total_moves,
                unhappy = self.last_report.map_or(0, |r| r.unhappy),
                "Step budget exhausted"
            );
        }
        summary
    }

    /// Discards the current grid and repopulates from the same config.
    ///
    /// The random source is not re-seeded, so a seeded run produces a new
    /// layout rather than replaying the previous one.
    pub fn reset(&mut self) -> Result<()> {
        self.grid = populate(&self.config, &mut self.rng)?;
        self.steps = 0;
        self.last_report = None;
        self.converged = false;
        self.metrics.reset();
        Ok(())
    }
}

/// Builds a simulation from `config` and runs it for at most `max_steps`.
pub fn run(config: SimConfig, max_steps: u64) -> Result<Grid> {
    let mut sim = Simulation::new(config)?;
    sim.run(max_steps);
    Ok(sim.into_grid())
}
